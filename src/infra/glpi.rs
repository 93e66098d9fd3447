use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::ticket::TicketSummary;
use crate::error::{AppError, AppResult};
use crate::services::TicketService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// GLPI status codes: 1 = new, 2 = in progress.
const OPEN_STATUSES: [u32; 2] = [1, 2];

/// A ticket as returned by the GLPI REST API. `content` may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct GlpiTicket {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub status: u32,
}

/// Low-level session operations against a GLPI instance. Split out so the
/// acquire/use/release orchestration can be exercised without a server.
#[async_trait]
pub trait GlpiApi: Send + Sync {
    async fn init_session(&self) -> AppResult<String>;
    async fn list_tickets(&self, session_token: &str, limit: usize) -> AppResult<Vec<GlpiTicket>>;
    async fn kill_session(&self, session_token: &str);
}

pub struct GlpiClient {
    api: Box<dyn GlpiApi>,
}

impl GlpiClient {
    pub fn new(
        base_url: Option<String>,
        app_token: Option<String>,
        user_token: Option<String>,
    ) -> Self {
        Self {
            api: Box::new(GlpiHttp::new(base_url, app_token, user_token)),
        }
    }

    #[cfg(test)]
    fn with_api(api: Box<dyn GlpiApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TicketService for GlpiClient {
    /// One session per fetch: acquire, query, release. The session is killed
    /// on every exit path, including a failed query; any transport error
    /// still aborts the whole fetch with no partial results.
    async fn fetch_open_tickets(&self, limit: usize) -> AppResult<Vec<TicketSummary>> {
        let session_token = self.api.init_session().await?;
        let result = self.api.list_tickets(&session_token, limit).await;
        self.api.kill_session(&session_token).await;

        Ok(filter_open(result?))
    }
}

fn filter_open(tickets: Vec<GlpiTicket>) -> Vec<TicketSummary> {
    tickets
        .into_iter()
        .filter(|ticket| OPEN_STATUSES.contains(&ticket.status))
        .map(|ticket| TicketSummary {
            id: ticket.id,
            name: ticket.name,
            content: ticket.content,
        })
        .collect()
}

struct GlpiHttp {
    http: Client,
    base_url: Option<String>,
    app_token: Option<String>,
    user_token: Option<String>,
}

impl GlpiHttp {
    fn new(
        base_url: Option<String>,
        app_token: Option<String>,
        user_token: Option<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            app_token,
            user_token,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GLPI base URL not configured".to_string()))?;
        let app_token = self
            .app_token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GLPI app token not configured".to_string()))?;
        let user_token = self
            .user_token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GLPI user token not configured".to_string()))?;
        Ok((base_url, app_token, user_token))
    }

    fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}/apirest.php/{path}", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GlpiApi for GlpiHttp {
    async fn init_session(&self) -> AppResult<String> {
        let (base_url, app_token, user_token) = self.api_details()?;

        let response = self
            .http
            .get(Self::endpoint(base_url, "initSession"))
            .header("App-Token", app_token)
            .header("Authorization", format!("user_token {user_token}"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AppError::TicketSystem(format!("failed to open session: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::TicketSystem(format!(
                "initSession responded with {status}: {body}"
            )));
        }

        let payload: InitSessionResponse = response.json().await.map_err(|err| {
            AppError::TicketSystem(format!("failed to parse initSession response: {err}"))
        })?;

        tracing::debug!("GLPI session opened");
        Ok(payload.session_token)
    }

    async fn list_tickets(&self, session_token: &str, limit: usize) -> AppResult<Vec<GlpiTicket>> {
        let (base_url, app_token, user_token) = self.api_details()?;
        let range_end = limit.saturating_sub(1);

        let response = self
            .http
            .get(Self::endpoint(base_url, "Ticket/"))
            .query(&[("range", format!("0-{range_end}"))])
            .header("App-Token", app_token)
            .header("Authorization", format!("user_token {user_token}"))
            .header("Session-Token", session_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| AppError::TicketSystem(format!("failed to list tickets: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::TicketSystem(format!(
                "ticket listing responded with {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            AppError::TicketSystem(format!("failed to parse ticket listing: {err}"))
        })
    }

    async fn kill_session(&self, session_token: &str) {
        let Ok((base_url, app_token, user_token)) = self.api_details() else {
            return;
        };

        let result = self
            .http
            .get(Self::endpoint(base_url, "killSession"))
            .header("App-Token", app_token)
            .header("Authorization", format!("user_token {user_token}"))
            .header("Session-Token", session_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(_) => tracing::debug!("GLPI session closed"),
            Err(err) => tracing::warn!("failed to close GLPI session: {err}"),
        }
    }
}

#[derive(Deserialize)]
struct InitSessionResponse {
    session_token: String,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct StubApi {
        fail_listing: bool,
        kill_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GlpiApi for StubApi {
        async fn init_session(&self) -> AppResult<String> {
            Ok("sess-token".to_string())
        }

        async fn list_tickets(
            &self,
            session_token: &str,
            _limit: usize,
        ) -> AppResult<Vec<GlpiTicket>> {
            assert_eq!(session_token, "sess-token");
            if self.fail_listing {
                return Err(AppError::TicketSystem("listing responded with 500".to_string()));
            }
            Ok(vec![
                GlpiTicket {
                    id: 1,
                    name: "Impresora sin tóner".to_string(),
                    content: "Piso 3".to_string(),
                    status: 1,
                },
                GlpiTicket {
                    id: 2,
                    name: "VPN caída".to_string(),
                    content: String::new(),
                    status: 2,
                },
                GlpiTicket {
                    id: 3,
                    name: "Ticket resuelto".to_string(),
                    content: String::new(),
                    status: 5,
                },
            ])
        }

        async fn kill_session(&self, session_token: &str) {
            assert_eq!(session_token, "sess-token");
            self.kill_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn keeps_only_open_statuses() {
        let kill_calls = Arc::new(AtomicUsize::new(0));
        let client = GlpiClient::with_api(Box::new(StubApi {
            fail_listing: false,
            kill_calls: kill_calls.clone(),
        }));

        let tickets = client.fetch_open_tickets(20).await.unwrap();
        assert_eq!(
            tickets.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(kill_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn session_closed_exactly_once_when_query_fails() {
        let kill_calls = Arc::new(AtomicUsize::new(0));
        let client = GlpiClient::with_api(Box::new(StubApi {
            fail_listing: true,
            kill_calls: kill_calls.clone(),
        }));

        let result = client.fetch_open_tickets(20).await;
        assert!(matches!(result, Err(AppError::TicketSystem(_))));
        assert_eq!(kill_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let ticket: GlpiTicket =
            serde_json::from_str(r#"{"id": 7, "name": "Sin contenido", "status": 1}"#).unwrap();
        assert_eq!(ticket.content, "");
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        assert_eq!(
            GlpiHttp::endpoint("https://helpdesk.example/glpi/", "initSession"),
            "https://helpdesk.example/glpi/apirest.php/initSession"
        );
    }
}
