//! Verification status and the HTTP code → description table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel printed in place of a status code when the URL could not be reached.
pub const ERROR_SENTINEL: &str = "Erro";

/// Printed in place of a status code for full-render results.
pub const RENDERED_LABEL: &str = "Renderizado";

/// Description used for codes missing from [`KnownStatus`].
pub const UNKNOWN_DESCRIPTION: &str = "Erro desconhecido";

/// Description attached to a successful full-render navigation.
pub const RENDERED_DESCRIPTION: &str = "Página carregada";

/// HTTP status codes with a fixed analyst-facing description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownStatus {
    Ok,
    Created,
    NoContent,
    MovedPermanently,
    Found,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ProxyAuthenticationRequired,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
}

impl KnownStatus {
    /// Look up a numeric code. `None` means the default description applies.
    pub fn from_code(code: u16) -> Option<Self> {
        let known = match code {
            200 => Self::Ok,
            201 => Self::Created,
            204 => Self::NoContent,
            301 => Self::MovedPermanently,
            302 => Self::Found,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            407 => Self::ProxyAuthenticationRequired,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => return None,
        };
        Some(known)
    }

    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::MovedPermanently => 301,
            Self::Found => 302,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::ProxyAuthenticationRequired => 407,
            Self::InternalServerError => 500,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
            Self::GatewayTimeout => 504,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "Sucesso",
            Self::Created => "Criado",
            Self::NoContent => "Nenhum Conteúdo",
            Self::MovedPermanently => "Movido Permanentemente",
            Self::Found => "Encontrado",
            Self::BadRequest => "Requisição Inválida",
            Self::Unauthorized => "Não Autorizado",
            Self::Forbidden => "Proibido",
            Self::NotFound => "Página Não Encontrada",
            Self::ProxyAuthenticationRequired => "Autenticação Proxy Necessária",
            Self::InternalServerError => "Erro Interno do Servidor",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Serviço Indisponível",
            Self::GatewayTimeout => "Tempo Limite da Conexão Excedido",
        }
    }
}

/// Describe any numeric HTTP status code.
pub fn describe_code(code: u16) -> &'static str {
    KnownStatus::from_code(code)
        .map(KnownStatus::description)
        .unwrap_or(UNKNOWN_DESCRIPTION)
}

/// Classification of a verified URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum Status {
    /// A real HTTP response code from the lightweight strategy.
    Http(u16),
    /// The full-render strategy loaded the page. Carries no HTTP code.
    Rendered,
    /// The URL could not be reached at all.
    Error,
}

impl Status {
    /// Whether this status belongs in the success analytics stream.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Http(200) | Self::Rendered)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{code}"),
            Self::Rendered => f.write_str(RENDERED_LABEL),
            Self::Error => f.write_str(ERROR_SENTINEL),
        }
    }
}

/// The result of checking one URL. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub url: String,
    pub status: Status,
    pub description: String,
}

impl VerificationOutcome {
    /// Outcome for an HTTP response, described through the status table.
    pub fn http(url: impl Into<String>, code: u16) -> Self {
        Self {
            url: url.into(),
            status: Status::Http(code),
            description: describe_code(code).to_string(),
        }
    }

    /// Outcome for a page the browser managed to load.
    pub fn rendered(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Status::Rendered,
            description: RENDERED_DESCRIPTION.to_string(),
        }
    }

    /// Outcome for a URL that could not be reached.
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Status::Error,
            description: reason.into(),
        }
    }
}
