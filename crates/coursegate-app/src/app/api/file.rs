use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use tracing::error;

use coursegate_core::constants::{FILE_LIST_ROUTE_COMPONENT, messages};
use coursegate_service::error::ServiceError;
use coursegate_service::listing::{FileEntry, FileLibrary, ListingQuery};

use crate::config::get_config_from_depot;

/// ## Summary
/// Listing response payload. `err` is empty and `files` populated on success;
/// on failure `files` is empty.
#[derive(Debug, Default, Serialize)]
pub struct FileListResponse {
    pub err: String,
    pub files: Vec<FileEntry>,
}

impl FileListResponse {
    fn error(message: &str) -> Json<Self> {
        Json(Self {
            err: message.to_string(),
            files: Vec::new(),
        })
    }
}

/// ## Summary
/// GET /api/file?dir=NAME[&course] - Lists the files of a top-level directory.
///
/// `course` counts as present with any value, including none.
///
/// ## Errors
/// Reports `params error` for a missing `dir` or an unlistable path and
/// `access denied` for a `dir` that is not a top-level directory, both with
/// HTTP 200. Returns HTTP 500 if the file root cannot be read.
#[handler]
async fn list_files(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(dir) = req.query::<String>("dir") else {
        res.render(FileListResponse::error(messages::PARAMS_ERROR));
        return;
    };
    let course = req.queries().contains_key("course");

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(FileListResponse::error(messages::INTERNAL_SERVER_ERROR));
            return;
        }
    };

    let library = FileLibrary::from_config(&config.files);
    match library.list(&ListingQuery { dir, course }).await {
        Ok(files) => res.render(Json(FileListResponse {
            err: String::new(),
            files,
        })),
        Err(ServiceError::InvalidParams) => {
            res.render(FileListResponse::error(messages::PARAMS_ERROR));
        }
        Err(ServiceError::AccessDenied(_)) => {
            res.render(FileListResponse::error(messages::ACCESS_DENIED));
        }
        Err(e) => {
            error!(error = ?e, "Failed to list files");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(FileListResponse::error(messages::INTERNAL_SERVER_ERROR));
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(FILE_LIST_ROUTE_COMPONENT).get(list_files)
}
