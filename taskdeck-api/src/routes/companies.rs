/// Company endpoints
///
/// Companies are seeded by migration; the API only lists their names.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use taskdeck_shared::models::company::Company;

/// Company labels
///
/// # Endpoint
///
/// ```text
/// GET /api/companies
/// ```
pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let companies = Company::list(&state.db).await?;

    Ok(Json(companies.into_iter().map(|c| c.name).collect()))
}
