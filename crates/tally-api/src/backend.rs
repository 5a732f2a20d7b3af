//! # Invoice Backend
//!
//! The calls the draft editor needs, behind a trait so the editor can run
//! against the HTTP client or an in-memory double.

use std::sync::Arc;

use async_trait::async_trait;
use tally_core::listing::InvoiceFilter;
use tally_core::numbering::next_invoice_number;
use tally_core::types::{Invoice, InvoiceId, InvoicePayload, InvoiceSummary, Item};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    async fn list_items(&self) -> ApiResult<Vec<Item>>;

    async fn get_invoice(&self, id: InvoiceId) -> ApiResult<Invoice>;

    async fn list_invoices(&self, filter: &InvoiceFilter) -> ApiResult<Vec<InvoiceSummary>>;

    async fn save_invoice(&self, payload: &InvoicePayload) -> ApiResult<Option<Invoice>>;

    /// Advisory number for a new invoice: highest numeric `invoiceNo` in
    /// the unfiltered list plus one. The server assigns the real number.
    async fn next_invoice_number(&self) -> ApiResult<u64> {
        let rows = self.list_invoices(&InvoiceFilter::default()).await?;
        Ok(next_invoice_number(
            rows.iter().filter_map(|row| row.invoice_no.as_deref()),
        ))
    }
}

#[async_trait]
impl InvoiceBackend for ApiClient {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        ApiClient::list_items(self).await
    }

    async fn get_invoice(&self, id: InvoiceId) -> ApiResult<Invoice> {
        ApiClient::get_invoice(self, id).await
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> ApiResult<Vec<InvoiceSummary>> {
        ApiClient::list_invoices(self, filter).await
    }

    async fn save_invoice(&self, payload: &InvoicePayload) -> ApiResult<Option<Invoice>> {
        ApiClient::save_invoice(self, payload).await
    }
}

#[async_trait]
impl<T: InvoiceBackend + ?Sized> InvoiceBackend for Arc<T> {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        (**self).list_items().await
    }

    async fn get_invoice(&self, id: InvoiceId) -> ApiResult<Invoice> {
        (**self).get_invoice(id).await
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> ApiResult<Vec<InvoiceSummary>> {
        (**self).list_invoices(filter).await
    }

    async fn save_invoice(&self, payload: &InvoicePayload) -> ApiResult<Option<Invoice>> {
        (**self).save_invoice(payload).await
    }

    async fn next_invoice_number(&self) -> ApiResult<u64> {
        (**self).next_invoice_number().await
    }
}
