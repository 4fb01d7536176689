//! Support assistant endpoints backed by the chat-completion client

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::llm;
use crate::models::{non_blank, ValidationError};

#[derive(Debug, Default, Deserialize)]
pub struct DiagnosisRequest {
    pub descripcion: Option<String>,
    pub activo_modelo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GuideRequest {
    pub mensaje: Option<String>,
}

/// POST /api/sugerir-solucion - JSON diagnosis `{diagnostico, pasos, riesgo}`
async fn suggest_solution(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<DiagnosisRequest>,
) -> Result<Json<Value>, ApiError> {
    let descripcion = non_blank(body.descripcion.as_deref())
        .ok_or_else(|| ValidationError::required("Por favor, describe el problema."))?;

    llm::diagnose(
        state.llm.as_ref(),
        descripcion,
        non_blank(body.activo_modelo.as_deref()),
    )
    .await
    .map(Json)
    .map_err(|e| {
        tracing::error!("diagnosis request failed: {}", e);
        ApiError::operational(
            StatusCode::INTERNAL_SERVER_ERROR,
            "El asistente virtual no pudo procesar la solicitud.",
        )
    })
}

/// POST /api/chat-guia - `{respuesta}`
async fn guide_chat(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<GuideRequest>,
) -> Result<Json<Value>, ApiError> {
    let mensaje = non_blank(body.mensaje.as_deref())
        .ok_or_else(|| ValidationError::required("Mensaje vacío"))?;

    let respuesta = llm::guide_reply(state.llm.as_ref(), mensaje)
        .await
        .map_err(|e| {
            tracing::error!("guide chat failed: {}", e);
            ApiError::operational(
                StatusCode::INTERNAL_SERVER_ERROR,
                "El asistente está reiniciando sus sistemas. Intenta en un momento.",
            )
        })?;
    Ok(Json(json!({ "respuesta": respuesta })))
}

/// Assistant routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sugerir-solucion", post(suggest_solution))
        .route("/api/chat-guia", post(guide_chat))
}
