use anyhow::bail;
use config::{AnyOrList, CorsConfig};
use http::Method;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub(super) fn generate(
    CorsConfig {
        allow_credentials,
        allow_origins,
        allow_methods,
        allow_headers,
        max_age,
    }: &CorsConfig,
) -> anyhow::Result<CorsLayer> {
    let wildcard = [
        matches!(allow_origins, Some(AnyOrList::Any)),
        matches!(allow_methods, Some(AnyOrList::Any)),
        matches!(allow_headers, Some(AnyOrList::Any)),
    ];

    if *allow_credentials && wildcard.contains(&true) {
        bail!("CORS credentials cannot be allowed together with a \"*\" origin, method or header list");
    }

    let mut cors_layer = CorsLayer::new().allow_credentials(*allow_credentials);

    if let Some(allow_origins) = allow_origins {
        cors_layer = cors_layer.allow_origin(match allow_origins {
            AnyOrList::Any => AllowOrigin::any(),
            AnyOrList::Explicit(origins) => AllowOrigin::list(origins.iter().cloned()),
        });
    }

    if let Some(allow_methods) = allow_methods {
        cors_layer = cors_layer.allow_methods(match allow_methods {
            AnyOrList::Any => AllowMethods::any(),
            AnyOrList::Explicit(methods) => {
                let mut methods = methods.clone();

                // Preflight requests must always be answered
                if !methods.contains(&Method::OPTIONS) {
                    methods.push(Method::OPTIONS);
                }

                AllowMethods::list(methods)
            }
        });
    }

    if let Some(allow_headers) = allow_headers {
        cors_layer = cors_layer.allow_headers(match allow_headers {
            AnyOrList::Any => AllowHeaders::any(),
            AnyOrList::Explicit(headers) => AllowHeaders::list(headers.iter().cloned()),
        });
    }

    if let Some(max_age) = max_age {
        cors_layer = cors_layer.max_age(*max_age);
    }

    Ok(cors_layer)
}
