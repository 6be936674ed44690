// Adax REST API
//
// Bearer-token REST surface under `rest/v1/`. Transport mechanics live in
// `client`, token exchange in `auth`, endpoint groups in their own files.

mod auth;
mod client;
mod energy;
pub mod models;
mod rooms;

pub use client::CloudClient;
