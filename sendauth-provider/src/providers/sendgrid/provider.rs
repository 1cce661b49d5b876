//! SendGrid `EmailDomainRegistry` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{EmailDomainRegistry, ErrorContext};
use crate::types::{
    DomainAuthRecord, DomainQuery, DomainSummary, DomainValidation, NewDomainRequest,
};

use super::{DOMAINS_PATH, SendgridProvider};

#[async_trait]
impl EmailDomainRegistry for SendgridProvider {
    fn id(&self) -> &'static str {
        "sendgrid"
    }

    async fn list_domains(&self, query: &DomainQuery) -> Result<Vec<DomainSummary>> {
        let mut path = format!(
            "{DOMAINS_PATH}?limit={}&offset={}",
            query.limit, query.offset
        );
        if let Some(domain) = &query.domain {
            path.push_str("&domain=");
            path.push_str(&urlencoding::encode(domain));
        }

        let context = ErrorContext {
            domain: query.domain.clone(),
            ..Default::default()
        };
        self.get(&path, context).await
    }

    async fn create_domain(&self, req: &NewDomainRequest) -> Result<DomainSummary> {
        let context = ErrorContext {
            domain: Some(req.domain.clone()),
            ..Default::default()
        };
        let created: DomainSummary = self.post(DOMAINS_PATH, Some(req), 201, context).await?;
        log::info!(
            "[sendgrid] Registered domain {} with id {}",
            created.domain,
            created.id
        );
        Ok(created)
    }

    async fn get_domain(&self, id: u64) -> Result<DomainAuthRecord> {
        let context = ErrorContext {
            domain: Some(id.to_string()),
            ..Default::default()
        };
        self.get(&format!("{DOMAINS_PATH}/{id}"), context).await
    }

    async fn validate_domain(&self, id: u64) -> Result<DomainValidation> {
        let context = ErrorContext {
            domain: Some(id.to_string()),
            ..Default::default()
        };
        self.post::<_, ()>(&format!("{DOMAINS_PATH}/{id}/validate"), None, 200, context)
            .await
    }
}
