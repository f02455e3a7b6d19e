#[cfg(test)]
mod static_host_tests {
    use super::super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use std::fs;
    use tempfile::TempDir;

    const INDEX_HTML: &str = "<!doctype html><div id=\"root\"></div>";

    fn asset_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.js"), "console.log('app')").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        fs::create_dir(dir.path().join(".well-known")).unwrap();
        fs::write(dir.path().join(".well-known/secret.txt"), "do not serve").unwrap();
        dir
    }

    macro_rules! static_app {
        ($root:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(StaticAssets::new($root)))
                    .default_service(web::to(serve)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_existing_file_is_served_with_cache_header() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/assets/app.js").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "max-age=86400"
        );
        assert!(resp.headers().contains_key(header::LAST_MODIFIED));
        assert_eq!(test::read_body(resp).await, "console.log('app')");
    }

    #[actix_web::test]
    async fn test_extensionless_path_gets_fallback_document() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        for uri in ["/", "/dashboard", "/library/123", "/knowledge-base/"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("text/html"));
            assert_eq!(test::read_body(resp).await, INDEX_HTML);
        }
    }

    #[actix_web::test]
    async fn test_fallback_ignores_method() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::post().uri("/login").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, INDEX_HTML);
    }

    #[actix_web::test]
    async fn test_missing_file_with_extension_is_plain_404() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/assets/missing.css").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(resp).await, "Not Found");
    }

    #[actix_web::test]
    async fn test_api_like_paths_do_not_fall_back() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/apiary").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_missing_fallback_document() {
        let dir = asset_tree();
        fs::remove_file(dir.path().join("index.html")).unwrap();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(resp).await, "Frontend not found");
    }

    #[actix_web::test]
    async fn test_unreadable_fallback_document() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the document should be cannot be read as text
        fs::create_dir(dir.path().join("index.html")).unwrap();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, "Internal Server Error");
    }

    #[actix_web::test]
    async fn test_hidden_files_are_not_served() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/.env").to_request();
        let resp = test::call_service(&app, req).await;

        // No extension on ".env", so it lands on the fallback document
        assert_eq!(test::read_body(resp).await, INDEX_HTML);

        // A hidden directory hides its files too, and ".txt" rules out the fallback
        let req = test::TestRequest::get().uri("/.well-known/secret.txt").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(resp).await, "Not Found");
    }

    #[actix_web::test]
    async fn test_gzip_sibling_is_preferred_when_accepted() {
        let dir = asset_tree();
        fs::write(dir.path().join("assets/app.js.gz"), b"\x1f\x8bfake").unwrap();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get()
            .uri("/assets/app.js")
            .insert_header((header::ACCEPT_ENCODING, "gzip, deflate, br"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(test::read_body(resp).await, &b"\x1f\x8bfake"[..]);

        let req = test::TestRequest::get().uri("/assets/app.js").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(!resp.headers().contains_key(header::CONTENT_ENCODING));
    }

    #[actix_web::test]
    async fn test_traversal_is_rejected() {
        let dir = asset_tree();
        let app = static_app!(dir.path().join("assets"));

        let req = test::TestRequest::get().uri("/%2e%2e/index.html").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_directories_are_not_served_as_files() {
        let dir = asset_tree();
        let app = static_app!(dir.path());

        let req = test::TestRequest::get().uri("/assets").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(test::read_body(resp).await, INDEX_HTML);
    }
}
