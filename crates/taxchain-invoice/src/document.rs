//! # Invoice Documents
//!
//! JSON form of an invoice where templates are declared once and line items
//! refer to them by id.
//!
//! ```json
//! {
//!   "templates": [
//!     { "id": "Simple",
//!       "applications": [ { "type": "percent", "rate": 10.0, "apply_on": "reference_value" } ] }
//!   ],
//!   "items": [
//!     { "name": "Widget", "amount": 10000, "template": "Simple" },
//!     { "amount": 22000, "inclusive": true, "template": "Simple" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use taxchain_core::{Money, TaxTemplate};

use crate::error::{InvoiceError, InvoiceResult};
use crate::invoice::Invoice;
use crate::line_item::LineItem;

/// A line item that names its template instead of embedding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRef {
    #[serde(default)]
    pub name: String,
    pub amount: Money,
    #[serde(default)]
    pub inclusive: bool,
    pub template: String,
}

/// Serialized invoice with shared templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(default)]
    pub templates: Vec<TaxTemplate>,
    #[serde(default)]
    pub items: Vec<LineItemRef>,
}

impl InvoiceDocument {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> InvoiceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds an [`Invoice`], sharing one `Arc` per template.
    ///
    /// Every template is validated here, so an unspecified rule is reported
    /// even if no item uses that template.
    pub fn into_invoice(self) -> InvoiceResult<Invoice> {
        let mut templates: HashMap<String, Arc<TaxTemplate>> =
            HashMap::with_capacity(self.templates.len());

        for template in self.templates {
            template
                .validate()
                .map_err(|source| InvoiceError::InvalidTemplate {
                    template: template.id().to_string(),
                    source,
                })?;

            let id = template.id().to_string();
            if templates.contains_key(&id) {
                return Err(InvoiceError::DuplicateTemplate { template: id });
            }
            templates.insert(id, Arc::new(template));
        }

        self.items
            .into_iter()
            .enumerate()
            .map(|(index, item)| -> InvoiceResult<LineItem> {
                let template = templates.get(&item.template).ok_or_else(|| {
                    InvoiceError::UnknownTemplate {
                        index,
                        template: item.template.clone(),
                    }
                })?;

                Ok(LineItem::new(item.amount, item.inclusive, Arc::clone(template)).named(item.name))
            })
            .collect()
    }
}
