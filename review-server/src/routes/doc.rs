use crate::routes::{health, reviews};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "review-server",
    description = "Collects free-text reviews and tags each with a sentiment label",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(reviews::ReviewsApi::openapi());
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_cover_review_and_health_paths() {
        let docs = get_docs();
        assert!(docs.paths.paths.contains_key("/reviews"));
        assert!(docs.paths.paths.contains_key("/health"));
    }
}
