use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
/// OpenAPI document for the scoreboard REST and WebSocket endpoints.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::score::submit_ball,
        crate::routes::score::current_match,
        crate::routes::user::signup,
        crate::routes::user::signin,
        crate::routes::user::me,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ball::BallRequest,
            crate::dto::ball::BallResponse,
            crate::dto::ball::ExtraInput,
            crate::dto::scoreboard::MatchSnapshot,
            crate::dto::user::SignupRequest,
            crate::dto::user::SigninRequest,
            crate::dto::user::TokenResponse,
            crate::dto::user::MeResponse,
            crate::dto::ws::ViewerOutboundMessage,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "score", description = "Ball-by-ball scoring of the live match"),
        (name = "user", description = "Scorer accounts and tokens"),
        (name = "viewers", description = "WebSocket stream of score updates"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_public_routes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        for path in ["/api/v1/score", "/api/v1/user/signup", "/ws", "/healthcheck"] {
            assert!(json.contains(path), "missing {path}");
        }
        assert!(json.contains("bearer"));
    }
}
