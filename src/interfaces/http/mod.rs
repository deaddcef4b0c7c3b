// ============================================================
// HTTP API
// ============================================================
// Upload -> clean -> download over actix-web

use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentDisposition;
use actix_web::http::StatusCode;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::application::CleaningPipeline;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CleaningConfig, PreviewSample};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::format::FileFormat;
use crate::infrastructure::storage::StagingArea;

pub struct HttpState {
    pipeline: CleaningPipeline,
    staging: StagingArea,
    max_upload_bytes: usize,
}

impl HttpState {
    pub fn new(pipeline: CleaningPipeline, staging: StagingArea, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            staging,
            max_upload_bytes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub preview_before: PreviewSample,
    pub preview_after: PreviewSample,
    pub download_url: String,
    pub output_filename: String,
    pub rows_before: usize,
    pub rows_after: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Upload fields collected from the multipart body
#[derive(Debug, Default)]
struct CleanForm {
    filename: Option<String>,
    bytes: Vec<u8>,
    config: CleaningConfig,
}

#[get("/")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "Data Cleaner API is running",
    })
}

#[post("/clean")]
async fn clean(data: web::Data<HttpState>, payload: Multipart) -> impl Responder {
    let form = match read_clean_form(payload, data.max_upload_bytes).await {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    let state = data.clone();
    match web::block(move || process_upload(&state, form)).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(e)) => error_response(&e),
        Err(e) => error_response(&AppError::IoError(format!("Cleaning task failed: {}", e))),
    }
}

#[get("/download/{filename}")]
async fn download(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let filename = path.into_inner();
    let state = data.clone();
    let name = filename.clone();

    match web::block(move || state.staging.read_output(&name)).await {
        Ok(Ok(bytes)) => {
            let media_type = FileFormat::from_filename(&filename)
                .map(FileFormat::media_type)
                .unwrap_or("application/octet-stream");
            HttpResponse::Ok()
                .content_type(media_type)
                .insert_header(ContentDisposition::attachment(filename))
                .body(bytes)
        }
        Ok(Err(e)) => error_response(&e),
        Err(e) => error_response(&AppError::IoError(format!("Download task failed: {}", e))),
    }
}

/// Stage the upload, run the pipeline, store the cleaned file
fn process_upload(state: &HttpState, form: CleanForm) -> Result<CleanResponse> {
    let filename = form
        .filename
        .ok_or_else(|| AppError::ValidationError("Missing 'file' field".to_string()))?;

    state.staging.save_upload(&filename, &form.bytes)?;
    let result = state.pipeline.run(&form.bytes, &filename, &form.config)?;
    let stored = state
        .staging
        .save_output(result.output_filename(), result.cleaned_bytes())?;

    Ok(CleanResponse {
        preview_before: result.before().clone(),
        preview_after: result.after().clone(),
        download_url: format!("/download/{}", stored),
        output_filename: result.output_filename().to_string(),
        rows_before: result.rows_before(),
        rows_after: result.rows_after(),
    })
}

async fn read_clean_form(mut payload: Multipart, limit: usize) -> Result<CleanForm> {
    let mut form = CleanForm::default();
    let mut received = 0usize;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let upload_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let bytes = read_field(&mut field, limit, &mut received).await?;

        match name.as_str() {
            "file" => {
                let filename = upload_name
                    .filter(|f| !f.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError("Uploaded file has no name".to_string())
                    })?;
                info!(filename = %filename, bytes = bytes.len(), "Received upload");
                form.filename = Some(filename);
                form.bytes = bytes;
            }
            "trim_spaces" => form.config.trim_spaces = parse_form_flag(&name, &bytes)?,
            "remove_duplicates" => form.config.remove_duplicates = parse_form_flag(&name, &bytes)?,
            "remove_blank_rows" => form.config.remove_blank_rows = parse_form_flag(&name, &bytes)?,
            other => warn!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_field(field: &mut Field, limit: usize, received: &mut usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        *received += chunk.len();
        if *received > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Upload exceeds {} bytes",
                limit
            )));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

/// HTML-form style boolean
fn parse_form_flag(name: &str, raw: &[u8]) -> Result<bool> {
    let value = String::from_utf8_lossy(raw).trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::ValidationError(format!(
            "Field '{}' must be a boolean, got '{}'",
            name, value
        ))),
    }
}

fn multipart_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::ValidationError(format!("Malformed multipart body: {}", err))
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::SerializeError(_) | AppError::ConfigError(_) | AppError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    let status = status_for(err);
    if status.is_server_error() {
        error!(kind = err.kind(), error = %err, "Request failed");
    } else {
        warn!(kind = err.kind(), error = %err, "Request rejected");
    }

    HttpResponse::build(status).json(ErrorBody {
        error: err.to_string(),
    })
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(clean).service(download);
}

pub fn start_server(
    config: &AppConfig,
    pipeline: CleaningPipeline,
    staging: StagingArea,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState::new(
        pipeline,
        staging,
        config.max_upload_bytes,
    ));

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(config.bind_address())?
    .run();

    info!(host = %config.host, port = config.port, "HTTP server listening");
    Ok(server)
}
