use std::fmt;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::{RequestBuilder, Url};

use crate::error::{AppError, AppResult, ConnectionError};

/// Service name CloudWatch requests are signed for.
const SIGNING_SERVICE: &str = "monitoring";

#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

pub(super) fn apply_sigv4(
    mut builder: RequestBuilder,
    url: &Url,
    headers: &[(&str, &str)],
    body: &[u8],
    credentials: &AwsCredentials,
    region: &str,
) -> AppResult<RequestBuilder> {
    let identity: Identity = Credentials::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        credentials.session_token.clone(),
        None,
        "cwdump",
    )
    .into();
    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SIGNING_SERVICE)
        .time(std::time::SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|err| {
            AppError::connection(ConnectionError::SigV4Params {
                source: Box::new(err),
            })
        })?
        .into();

    let signable = SignableRequest::new(
        "POST",
        url.as_str(),
        headers.iter().copied(),
        SignableBody::Bytes(body),
    )
    .map_err(|err| {
        AppError::connection(ConnectionError::SigV4Request {
            source: Box::new(err),
        })
    })?;

    let (instructions, _signature) = sign(signable, &signing_params)
        .map_err(|err| {
            AppError::connection(ConnectionError::SigV4Sign {
                source: Box::new(err),
            })
        })?
        .into_parts();

    let mut http_req = http::Request::builder().method("POST").uri(url.as_str());
    for (key, value) in headers {
        http_req = http_req.header(*key, *value);
    }
    let mut http_req = http_req.body(()).map_err(|err| {
        AppError::connection(ConnectionError::SigV4BuildSign {
            source: Box::new(err),
        })
    })?;
    instructions.apply_to_request_http1x(&mut http_req);

    for (name, value) in http_req.headers() {
        builder = builder.header(name, value);
    }
    Ok(builder)
}
