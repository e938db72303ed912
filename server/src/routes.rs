//! Route table for the HTTP API.
//!
//! Two sub-routers: the public one carries login and the token-guarded job
//! trigger, the protected one carries everything that needs a user session.

use axum::{
	Router, middleware,
	routing::{delete, get, patch, post},
};

use fatura_billing::{auth, client, export, invoice, rule, user};
use fatura_core::app::App;
use fatura_core::middleware::require_auth;
use fatura_reminder::handler::run_reminders;

pub fn init(app: App) -> Router {
	let public_router = Router::new()
		.route("/api/auth/login", post(auth::post_login))
		.route("/api/jobs/run-reminders", post(run_reminders));

	let protected_router = Router::new()
		.route("/api/users", get(user::list_users))
		.route("/api/users", post(user::post_user))
		.route("/api/clients", get(client::list_clients))
		.route("/api/clients", post(client::post_client))
		.route("/api/clients/{id}", get(client::get_client))
		.route("/api/clients/{id}", patch(client::patch_client))
		.route("/api/clients/{id}", delete(client::delete_client))
		.route("/api/invoices", get(invoice::list_invoices))
		.route("/api/invoices", post(invoice::post_invoice))
		.route("/api/invoices/export", get(export::export_invoices))
		.route("/api/invoices/{id}", get(invoice::get_invoice))
		.route("/api/invoices/{id}", patch(invoice::patch_invoice))
		.route("/api/invoices/{id}", delete(invoice::delete_invoice))
		.route("/api/invoices/{id}/mark-paid", post(invoice::mark_paid))
		.route("/api/reminder-rules", get(rule::list_rules))
		.route("/api/reminder-rules", post(rule::post_rule))
		.route("/api/reminder-rules/{id}", patch(rule::patch_rule))
		.layer(middleware::from_fn_with_state(app.clone(), require_auth));

	Router::new()
		.merge(public_router)
		.merge(protected_router)
		.with_state(app)
}


// vim: ts=4
