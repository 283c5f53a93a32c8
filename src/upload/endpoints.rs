use actix_web::post;
use actix_web::web::{Bytes, Data, Json, Query};
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::{sanitize_filename, FileStore};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadBody {
    pub url: String,
}

#[post("/upload")]
#[tracing::instrument(skip(store, content), fields(size = content.len()))]
pub async fn upload_file(
    store: Data<Box<dyn FileStore>>,
    params: Query<UploadParams>,
    content: Bytes,
) -> Result<Json<UploadBody>, Error> {
    let filename = sanitize_filename(&params.filename)?;

    let url = store.store(filename, &content).await?;

    Ok(Json(UploadBody { url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::FileSystemStore;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn upload_stores_file_under_sanitized_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path(), "http://cdn.test")
            .await
            .unwrap();
        let store: Box<dyn FileStore> = Box::new(store);
        let app = test::init_service(
            App::new()
                .app_data(Data::new(store))
                .configure(crate::configure),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/upload?filename=..%2F..%2Fbottle.png")
            .set_payload("image bytes")
            .to_request();
        let body: UploadBody = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.url, "http://cdn.test/static/uploads/bottle.png");
        assert!(dir.path().join("uploads").join("bottle.png").exists());
    }

    #[actix_rt::test]
    async fn upload_without_filename_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path(), "http://cdn.test")
            .await
            .unwrap();
        let store: Box<dyn FileStore> = Box::new(store);
        let app = test::init_service(
            App::new()
                .app_data(Data::new(store))
                .configure(crate::configure),
        )
        .await;

        let missing = test::TestRequest::post()
            .uri("/upload")
            .set_payload("image bytes")
            .to_request();
        let dot_dot = test::TestRequest::post()
            .uri("/upload?filename=..")
            .set_payload("image bytes")
            .to_request();

        assert_eq!(
            test::call_service(&app, missing).await.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            test::call_service(&app, dot_dot).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
