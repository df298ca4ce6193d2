//! Address route handlers.
//!
//! All handlers require an authenticated caller and only ever touch that
//! caller's addresses. An address that belongs to someone else is reported
//! exactly like one that does not exist.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use sweet_home_core::{Address, AddressId, AddressPatch, NewAddress};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

const ADDRESS_NOT_FOUND: &str = "Address not found";

/// Response body for `GET /api/addresses`.
#[derive(Debug, Serialize)]
pub struct AddressListResponse {
    pub success: bool,
    pub addresses: Vec<Address>,
}

/// Response body carrying a single address.
#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub success: bool,
    pub address: Address,
}

/// Bare success acknowledgment.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

/// List the caller's addresses, defaults first, then newest first.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<AddressListResponse>> {
    let addresses = state.addresses().list(user_id).await?;

    Ok(Json(AddressListResponse {
        success: true,
        addresses,
    }))
}

/// Add an address for the caller.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    payload: std::result::Result<Json<NewAddress>, JsonRejection>,
) -> Result<(StatusCode, Json<AddressResponse>)> {
    let Json(input) = payload?;
    let address = state.addresses().create(user_id, input).await?;

    tracing::info!(address_id = %address.id, is_default = address.is_default, "Address added");
    Ok((
        StatusCode::CREATED,
        Json(AddressResponse {
            success: true,
            address,
        }),
    ))
}

/// Update the supplied fields of one of the caller's addresses.
#[instrument(skip_all, fields(user_id = %user_id, address_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AddressPatch>, JsonRejection>,
) -> Result<Json<AddressResponse>> {
    let id = parse_address_id(&id)?;
    let Json(patch) = payload?;

    let address = state
        .addresses()
        .update(user_id, id, patch)
        .await
        .map_err(address_error)?;

    Ok(Json(AddressResponse {
        success: true,
        address,
    }))
}

/// Delete one of the caller's addresses.
#[instrument(skip_all, fields(user_id = %user_id, address_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Ack>> {
    let id = parse_address_id(&id)?;

    if !state.addresses().delete(user_id, id).await? {
        return Err(AppError::NotFound(ADDRESS_NOT_FOUND.to_string()));
    }

    tracing::info!("Address deleted");
    Ok(Json(Ack { success: true }))
}

/// Mark one of the caller's addresses as a default.
///
/// Other addresses keep their default flag.
#[instrument(skip_all, fields(user_id = %user_id, address_id = %id))]
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<AddressResponse>> {
    let id = parse_address_id(&id)?;

    let address = state
        .addresses()
        .set_default(user_id, id)
        .await
        .map_err(address_error)?;

    Ok(Json(AddressResponse {
        success: true,
        address,
    }))
}

/// A malformed ID cannot name one of the caller's addresses.
fn parse_address_id(raw: &str) -> Result<AddressId> {
    AddressId::parse(raw).map_err(|_| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))
}

fn address_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(ADDRESS_NOT_FOUND.to_string()),
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_address_id("64b7f0c2e1").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        assert!(matches!(
            address_error(RepositoryError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            address_error(RepositoryError::Conflict("dup".to_string())),
            AppError::Database(_)
        ));
    }
}
