use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde::Serialize;
use shared::HealthResponse;
use std::io::Write;

use crate::model::analyzer::MedicalImageAnalyzer;
use crate::storage::TransientStore;

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/analyze").route(web::post().to(analyze_image)))
        .service(web::resource("/health").route(web::get().to(health_check)));
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(payload: &mut Multipart) -> Result<Option<Upload>, String> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| format!("failed to parse multipart payload: {e}"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("failed to read multipart field: {e}"))?;
            bytes
                .write_all(&data)
                .map_err(|e| format!("failed to buffer upload: {e}"))?;
        }
        if !bytes.is_empty() {
            return Ok(Some(Upload { filename, bytes }));
        }
    }
    Ok(None)
}

async fn analyze_image(
    analyzer: web::Data<MedicalImageAnalyzer>,
    store: web::Data<TransientStore>,
    mut payload: Multipart,
) -> HttpResponse {
    let upload = match read_upload(&mut payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return server_error("no image uploaded in multipart field 'file'".into()),
        Err(detail) => return server_error(detail),
    };

    // The upload lives on disk only for the duration of this call; the handle
    // removes it on every exit path below.
    let file = match store.save(&upload.filename, &upload.bytes) {
        Ok(file) => file,
        Err(e) => return server_error(format!("failed to persist upload: {e}")),
    };

    match analyzer.predict(file.path()) {
        Ok(result) => {
            info!(
                "analyzed {}: {} ({:.3})",
                upload.filename, result.prediction, result.confidence
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => server_error(e.to_string()),
    }
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy())
}

fn server_error(detail: String) -> HttpResponse {
    error!("{}", detail);
    HttpResponse::InternalServerError().json(ErrorResponse { detail })
}
