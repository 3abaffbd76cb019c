use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use pica_core::{ArtifactId, ArtifactRecord, ClientId, PicaError, UseCase};
use serde_json::{json, Value};

use super::{AppState, PicaAxumError};
use crate::usecases::{DeleteImage, DeleteOutcome, DownloadImage, GetImage, ListImages, UploadImage};

type HandlerResult<T> = Result<T, PicaAxumError>;

/// The `file` part of an upload form.
struct FilePart {
    filename: String,
    content_type: Option<String>,
    bytes: Bytes,
}

fn multipart_error(err: MultipartError) -> PicaError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PicaError::invalid_image("Image exceeds the upload size limit")
    } else {
        PicaError::bad_request(format!("Malformed multipart body: {}", err.body_text()))
    }
}

async fn read_file_part(multipart: &mut Multipart) -> Result<FilePart, PicaError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(FilePart {
            filename,
            content_type,
            bytes,
        });
    }
    Err(PicaError::bad_request("Missing multipart field 'file'"))
}

/// `POST /images/upload/{client_id}`
pub async fn upload(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> HandlerResult<Json<Value>> {
    let client_id = ClientId::parse(client_id)?;
    let token = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.gate.authorize(token, &client_id).await?;

    let file = read_file_part(&mut multipart).await?;
    let declared = file.content_type.as_deref().unwrap_or_default();
    if !state.settings.accepts_content_type(declared) {
        return Err(PicaError::invalid_image(format!(
            "Only {} images are allowed",
            state.settings.allowed_content_types.join(", ")
        ))
        .into());
    }

    let id = state
        .upload
        .execute(UploadImage {
            client_id,
            filename: file.filename,
            bytes: file.bytes,
        })
        .await?;

    Ok(Json(json!({ "uuid": id })))
}

/// `POST|DELETE /images/delete/{uuid}`
///
/// Always 200; the body says whether anything was removed.
pub async fn delete(State(state): State<AppState>, Path(uuid): Path<String>) -> HandlerResult<Json<Value>> {
    let outcome = match uuid.parse::<ArtifactId>() {
        Ok(id) => state.delete.execute(DeleteImage { id }).await?,
        Err(_) => DeleteOutcome::NotFound,
    };
    Ok(Json(json!({ "Result": outcome.as_str() })))
}

/// `GET /images/metadata/{client_id}`
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> HandlerResult<Json<Vec<ArtifactRecord>>> {
    let client_id = ClientId::parse(client_id)?;
    let records = state.retrieval.execute(ListImages { client_id }).await?;
    Ok(Json(records))
}

/// `GET /images/record/{uuid}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> HandlerResult<Json<ArtifactRecord>> {
    let id: ArtifactId = uuid.parse()?;
    let record = state.retrieval.execute(GetImage { id }).await?;
    Ok(Json(record))
}

/// `GET /images/download/{uuid}`
pub async fn download(State(state): State<AppState>, Path(uuid): Path<String>) -> HandlerResult<Response> {
    let id: ArtifactId = uuid.parse()?;
    let download = state.retrieval.execute(DownloadImage { id }).await?;

    let disposition = format!("inline; filename=\"{}\"", header_safe(download.filename()));
    Ok((
        [
            (CONTENT_TYPE, header_safe(download.content_type())),
            (CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}

/// Visible ASCII only, without quotes or backslashes.
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::header_safe;

    #[test]
    fn header_values_are_reduced_to_visible_ascii() {
        assert_eq!(header_safe("cat.png"), "cat.png");
        assert_eq!(header_safe("a\"b\\c.png"), "a_b_c.png");
        assert_eq!(header_safe("café.jpg"), "caf_.jpg");
    }
}
