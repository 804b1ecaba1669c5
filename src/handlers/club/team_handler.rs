use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::club::ClubValidator;
use crate::db::helpers::{ensure_not_exists, require_affected, require_record};
use crate::db::teams;
use crate::error::AppError;
use crate::models::club::{CreateTeamRequest, UpdateTeamRequest};
use crate::models::common::ApiResponse;

#[tracing::instrument(name = "Create team", skip(request, pool), fields(name = %request.name))]
pub async fn create_team(
    request: web::Json<CreateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let name = ClubValidator::new().validate_name("Team name", &request.name)?;
    ensure_not_exists(teams::find_team_by_name(&pool, &name).await, "Team name already taken")?;

    let team = teams::insert_team(&pool, &name, request.image_url.as_deref())
        .await
        .map_err(|e| AppError::from_write(e, "Team name already taken"))?;

    tracing::info!("Created team {} ({})", team.name, team.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Team created", team)))
}

pub async fn list_teams(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let teams = teams::list_teams(&pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Teams retrieved", teams)))
}

pub async fn get_team(team_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let team = require_record(teams::find_team(&pool, team_id).await, "Team")?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team retrieved", team)))
}

#[tracing::instrument(name = "Update team", skip(request, pool), fields(team_id = %team_id))]
pub async fn update_team(
    team_id: Uuid,
    request: web::Json<UpdateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let name = match &request.name {
        Some(name) => Some(ClubValidator::new().validate_name("Team name", name)?),
        None => None,
    };

    let team = teams::update_team(&pool, team_id, name.as_deref(), request.image_url.as_deref())
        .await
        .map_err(|e| AppError::from_write(e, "Team name already taken"))?
        .ok_or_else(|| AppError::not_found("Team"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Team updated", team)))
}

#[tracing::instrument(name = "Delete team", skip(pool), fields(team_id = %team_id))]
pub async fn delete_team(team_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    require_affected(teams::delete_team(&pool, team_id).await?, "Team")?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Team deleted")))
}
