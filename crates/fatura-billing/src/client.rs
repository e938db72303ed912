//! Client CRUD.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::validate::{validate_email, validate_name};
use fatura_core::extract::Auth;
use fatura_core::guard::assert_tenant;
use fatura_core::perm::{Permission, authorize};
use fatura_types::store_adapter::{
	Client, ClientPatch, CreateClientData, Invoice, ListClientsOptions,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListClientsQuery {
	pub search: Option<String>,
}

/// `GET /api/clients`
pub async fn list_clients(
	State(app): State<App>,
	Auth(auth): Auth,
	Query(query): Query<ListClientsQuery>,
) -> FtResult<(StatusCode, Json<Vec<Client>>)> {
	authorize(&auth, Permission::ViewClient)?;
	let opts = ListClientsOptions { search: query.search.as_deref(), include_inactive: false };
	let clients = app.store_adapter.list_clients(auth.tn_id, &opts).await?;
	Ok((StatusCode::OK, Json(clients)))
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
	pub name: Box<str>,
	pub email: Box<str>,
	pub phone: Option<Box<str>>,
	pub document: Option<Box<str>>,
	pub address: Option<Box<str>>,
	pub notes: Option<Box<str>>,
}

/// `POST /api/clients`
pub async fn post_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateClientRequest>,
) -> FtResult<(StatusCode, Json<Client>)> {
	authorize(&auth, Permission::CreateClient)?;
	validate_name(&req.name)?;
	validate_email(&req.email)?;

	let client = app
		.store_adapter
		.create_client(
			auth.tn_id,
			&CreateClientData {
				name: &req.name,
				email: &req.email,
				phone: req.phone.as_deref(),
				document: req.document.as_deref(),
				address: req.address.as_deref(),
				notes: req.notes.as_deref(),
			},
		)
		.await?;
	info!("Client {} created by {}", client.client_id, auth.name);

	Ok((StatusCode::CREATED, Json(client)))
}

/// Client detail with its most recent invoices
#[derive(Debug, Serialize)]
pub struct ClientDetail {
	#[serde(flatten)]
	pub client: Client,
	pub invoices: Vec<Invoice>,
}

/// `GET /api/clients/{id}`
pub async fn get_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<i64>,
) -> FtResult<(StatusCode, Json<ClientDetail>)> {
	authorize(&auth, Permission::ViewClient)?;
	let client = app.store_adapter.read_client(client_id).await?;
	assert_tenant(&auth, client.tn_id)?;

	let invoices = app.store_adapter.list_client_invoices(client_id, 10).await?;
	Ok((StatusCode::OK, Json(ClientDetail { client, invoices })))
}

/// `PATCH /api/clients/{id}`
pub async fn patch_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<i64>,
	Json(patch): Json<ClientPatch>,
) -> FtResult<(StatusCode, Json<Client>)> {
	authorize(&auth, Permission::UpdateClient)?;
	let client = app.store_adapter.read_client(client_id).await?;
	assert_tenant(&auth, client.tn_id)?;

	if let Patch::Value(name) = &patch.name {
		validate_name(name)?;
	}
	if let Patch::Value(email) = &patch.email {
		validate_email(email)?;
	}

	let updated = app.store_adapter.update_client(client_id, &patch).await?;
	Ok((StatusCode::OK, Json(updated)))
}

/// `DELETE /api/clients/{id}`
///
/// Soft delete. The row keeps its invoice and event history and only leaves
/// the active listings.
pub async fn delete_client(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(client_id): Path<i64>,
) -> FtResult<(StatusCode, Json<serde_json::Value>)> {
	authorize(&auth, Permission::DeleteClient)?;
	let client = app.store_adapter.read_client(client_id).await?;
	assert_tenant(&auth, client.tn_id)?;

	let patch = ClientPatch { active: Patch::Value(false), ..Default::default() };
	app.store_adapter.update_client(client_id, &patch).await?;
	info!("Client {} deactivated by {}", client_id, auth.name);

	Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))))
}

// vim: ts=4
