//! # Invoice Draft
//!
//! The in-memory, unsaved, editable representation of one invoice.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  User Action              Draft Method            Change                │
//! │  ───────────              ────────────            ──────                │
//! │                                                                         │
//! │  Pick Item ──────────────► select_item() ───────► desc, rate, itemID   │
//! │                                                   (overwrites edits)    │
//! │  Type in cell ───────────► apply_edit() ────────► one field            │
//! │                                                                         │
//! │  Click "Add Row" ────────► add_row() ───────────► lines.push(blank)    │
//! │                                                                         │
//! │  Click Remove ───────────► remove_row() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  Click Save ─────────────► build_payload() ─────► (read only)          │
//! │                                                                         │
//! │  Every line change recomputes that line's amount before returning.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Identity
//! Each line gets a [`LineId`] when it is created. Removing a row never
//! renumbers the others. `rowNo` is only assigned in [`InvoiceDraft::build_payload`],
//! from the line's position among the lines that are sent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::{compute_totals, line_amount, InvoiceTotals};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::numbering::{
    bare_invoice_number, format_invoice_number, parse_invoice_number, strip_display_prefix,
};
use crate::types::{Invoice, InvoiceId, InvoiceLine, InvoicePayload, Item, ItemId, PayloadLine};
use crate::validation::{validate_percentage, LineEdit, ValidationResult};
use crate::{DEFAULT_TAX_PERCENTAGE, PENDING_INVOICE_NUMBER_TEXT};

// =============================================================================
// Line Item
// =============================================================================

/// Stable identity of a line within one draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(u32);

impl LineId {
    pub const fn from_raw(raw: u32) -> Self {
        LineId(raw)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One row of the draft.
///
/// ## Design Notes
/// - `description` and `rate` are snapshots taken when the item is picked.
///   Later catalog edits do not reach back into the draft.
/// - `amount` is derived. It is rewritten by every method that changes
///   quantity, rate or discount, and totals recompute it anyway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineId,

    /// `None` until an item is picked. Lines without an item are never sent.
    pub item_id: Option<ItemId>,

    pub description: String,

    pub quantity: Decimal,

    /// Unit rate at full precision.
    pub rate: Decimal,

    /// Percentage off (0-100). `None` counts as 0.
    pub discount_pct: Option<Decimal>,

    pub amount: Money,
}

impl LineItem {
    /// A fresh row: no item, quantity 1, rate 0, discount 0.
    pub fn blank(id: LineId) -> Self {
        LineItem {
            id,
            item_id: None,
            description: String::new(),
            quantity: Decimal::ONE,
            rate: Decimal::ZERO,
            discount_pct: Some(Decimal::ZERO),
            amount: Money::zero(),
        }
    }

    fn from_persisted(id: LineId, line: &InvoiceLine) -> Self {
        let mut item = LineItem {
            id,
            item_id: Some(line.item_id).filter(|id| *id > 0),
            description: line.description.clone(),
            quantity: line.quantity,
            rate: line.rate,
            discount_pct: Some(line.discount_pct.unwrap_or(Decimal::ZERO)),
            amount: Money::zero(),
        };
        item.recompute();
        item
    }

    /// Whether a catalog item has been picked for this row.
    pub fn has_item(&self) -> bool {
        matches!(self.item_id, Some(id) if id > 0)
    }

    /// Whether the user typed anything into this row.
    pub fn has_content(&self) -> bool {
        !self.description.trim().is_empty()
            || !self.rate.is_zero()
            || self.quantity != Decimal::ONE
            || self.discount_pct.is_some_and(|d| !d.is_zero())
    }

    pub fn recompute(&mut self) {
        self.amount = line_amount(self.quantity, self.rate, self.discount_pct);
    }

    fn apply(&mut self, edit: LineEdit) {
        let recalc = edit.field().affects_amount();
        match edit {
            LineEdit::Description(text) => self.description = text,
            LineEdit::Quantity(qty) => self.quantity = qty,
            LineEdit::Rate(rate) => self.rate = rate,
            LineEdit::DiscountPct(pct) => self.discount_pct = pct,
        }
        if recalc {
            self.recompute();
        }
    }

    fn to_payload(&self, row_no: u32, item_id: ItemId) -> PayloadLine {
        PayloadLine {
            row_no,
            item_id,
            description: self.description.clone(),
            quantity: self.quantity,
            rate: self.rate,
            discount_pct: self.discount_pct.filter(|d| !d.is_zero()),
        }
    }
}

// =============================================================================
// Invoice Number
// =============================================================================

/// The invoice number as the draft knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum InvoiceNumber {
    /// Preview not loaded yet.
    Pending,
    /// Client-side guess for a new invoice. Advisory only.
    Preview(u64),
    /// Number the server assigned to a persisted invoice (bare form).
    Assigned(String),
}

impl InvoiceNumber {
    /// Display form: `INV-0007`, or a placeholder while pending.
    pub fn display(&self) -> String {
        match self {
            InvoiceNumber::Pending => PENDING_INVOICE_NUMBER_TEXT.to_string(),
            InvoiceNumber::Preview(n) => format_invoice_number(*n),
            InvoiceNumber::Assigned(raw) => match parse_invoice_number(raw) {
                Some(n) => format_invoice_number(n),
                None => raw.clone(),
            },
        }
    }

    /// Value for the payload's `invoiceNo`, display prefix removed.
    pub fn payload_value(&self) -> Option<String> {
        match self {
            InvoiceNumber::Pending => None,
            InvoiceNumber::Preview(n) => Some(bare_invoice_number(*n)),
            InvoiceNumber::Assigned(raw) => Some(strip_display_prefix(raw.trim()).to_string()),
        }
    }
}

// =============================================================================
// Save Plan
// =============================================================================

/// A row left out of the payload because it has no item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    /// Zero-based position in the draft at save time.
    pub row: usize,
    pub line_id: LineId,
    pub description: String,
    /// False for untouched blank rows.
    pub has_content: bool,
}

/// Outbound payload plus what was left out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan {
    pub payload: InvoicePayload,
    pub dropped: Vec<DroppedRow>,
}

impl SavePlan {
    /// Dropped rows the user actually typed into.
    pub fn discarded_content(&self) -> impl Iterator<Item = &DroppedRow> {
        self.dropped.iter().filter(|row| row.has_content)
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The mutable editing session for one invoice.
///
/// ## Invariants
/// - Every line's `amount` matches its quantity, rate and discount
/// - `tax_percentage` is within 0-100
/// - Line ids are unique and never reused within a draft
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    invoice_id: Option<InvoiceId>,
    number: InvoiceNumber,
    invoice_date: NaiveDate,
    customer_name: String,
    address: String,
    city: String,
    notes: String,
    tax_percentage: Decimal,
    lines: Vec<LineItem>,
    #[serde(skip)]
    next_line_id: u32,
}

impl InvoiceDraft {
    /// A new invoice dated `today` with one blank row.
    pub fn new(today: NaiveDate) -> Self {
        let mut draft = InvoiceDraft {
            invoice_id: None,
            number: InvoiceNumber::Pending,
            invoice_date: today,
            customer_name: String::new(),
            address: String::new(),
            city: String::new(),
            notes: String::new(),
            tax_percentage: DEFAULT_TAX_PERCENTAGE,
            lines: Vec::new(),
            next_line_id: 1,
        };
        draft.add_row();
        draft
    }

    /// Hydrates a draft from a persisted invoice for editing.
    ///
    /// ## Defaults
    /// - absent `address`/`city`/`notes` → empty
    /// - absent `taxPercentage` → 10
    /// - null `discountPct` → 0
    /// - no lines → one blank row
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let mut persisted: Vec<&InvoiceLine> = invoice.lines.iter().collect();
        persisted.sort_by_key(|line| line.row_no);

        let mut draft = InvoiceDraft {
            invoice_id: Some(invoice.invoice_id),
            number: match invoice.invoice_no.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => InvoiceNumber::Assigned(raw.to_string()),
                _ => InvoiceNumber::Pending,
            },
            invoice_date: invoice.invoice_date,
            customer_name: invoice.customer_name.clone(),
            address: invoice.address.clone().unwrap_or_default(),
            city: invoice.city.clone().unwrap_or_default(),
            notes: invoice.notes.clone().unwrap_or_default(),
            tax_percentage: invoice.tax_percentage.unwrap_or(DEFAULT_TAX_PERCENTAGE),
            lines: Vec::with_capacity(persisted.len().max(1)),
            next_line_id: 1,
        };

        for line in persisted {
            let id = draft.allocate_line_id();
            draft.lines.push(LineItem::from_persisted(id, line));
        }
        if draft.lines.is_empty() {
            draft.add_row();
        }
        draft
    }

    fn allocate_line_id(&mut self) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        id
    }

    fn line_mut(&mut self, row: usize) -> CoreResult<&mut LineItem> {
        let len = self.lines.len();
        self.lines
            .get_mut(row)
            .ok_or(CoreError::RowOutOfRange { row, len })
    }

    // -------------------------------------------------------------------------
    // Line Operations
    // -------------------------------------------------------------------------

    /// Points the row at `item`, overwriting description and rate with the
    /// item's defaults. Manual edits on that row are discarded.
    pub fn select_item(&mut self, row: usize, item: &Item) -> CoreResult<()> {
        let line = self.line_mut(row)?;
        line.item_id = Some(item.item_id);
        line.description = item.item_name.clone();
        line.rate = item.sales_rate;
        line.recompute();
        Ok(())
    }

    /// Overwrites one scalar field of a row.
    pub fn apply_edit(&mut self, row: usize, edit: LineEdit) -> CoreResult<()> {
        self.line_mut(row)?.apply(edit);
        Ok(())
    }

    /// Appends a blank row and returns its id.
    pub fn add_row(&mut self) -> LineId {
        let id = self.allocate_line_id();
        self.lines.push(LineItem::blank(id));
        id
    }

    /// Removes the row at `row`. Other rows keep their ids.
    pub fn remove_row(&mut self, row: usize) -> CoreResult<LineItem> {
        if row >= self.lines.len() {
            return Err(CoreError::RowOutOfRange {
                row,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(row))
    }

    // -------------------------------------------------------------------------
    // Header Setters
    // -------------------------------------------------------------------------

    pub fn set_invoice_date(&mut self, date: NaiveDate) {
        self.invoice_date = date;
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Rejects values outside 0-100; the draft is unchanged on error.
    pub fn set_tax_percentage(&mut self, pct: Decimal) -> ValidationResult<()> {
        validate_percentage("taxPercentage", pct)?;
        self.tax_percentage = pct;
        Ok(())
    }

    pub fn set_number(&mut self, number: InvoiceNumber) {
        self.number = number;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    pub fn is_new(&self) -> bool {
        !matches!(self.invoice_id, Some(id) if id > 0)
    }

    pub fn number(&self) -> &InvoiceNumber {
        &self.number
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tax_percentage(&self) -> Decimal {
        self.tax_percentage
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&LineItem> {
        self.lines.get(row)
    }

    /// Subtotal, tax and grand total over lines with an item.
    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.lines, self.tax_percentage)
    }

    // -------------------------------------------------------------------------
    // Save
    // -------------------------------------------------------------------------

    /// Shapes the outbound save payload.
    ///
    /// ## Rules
    /// - customer name must not be blank
    /// - lines without an item are left out and reported in `dropped`
    /// - surviving lines are numbered `rowNo = 1..N` in row order
    /// - blank address/city/notes are sent as `null`
    /// - a zero or absent discount is sent as `null`
    /// - `invoiceID` is only sent when editing an existing invoice
    pub fn build_payload(&self) -> CoreResult<SavePlan> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(CoreError::CustomerRequired);
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        let mut dropped = Vec::new();

        for (row, line) in self.lines.iter().enumerate() {
            match line.item_id.filter(|id| *id > 0) {
                Some(item_id) => {
                    let row_no = lines.len() as u32 + 1;
                    lines.push(line.to_payload(row_no, item_id));
                }
                None => dropped.push(DroppedRow {
                    row,
                    line_id: line.id,
                    description: line.description.clone(),
                    has_content: line.has_content(),
                }),
            }
        }

        let payload = InvoicePayload {
            invoice_id: self.invoice_id.filter(|id| *id > 0),
            invoice_no: self.number.payload_value(),
            invoice_date: self.invoice_date,
            customer_name: customer_name.to_string(),
            address: non_blank(&self.address),
            city: non_blank(&self.city),
            tax_percentage: self.tax_percentage,
            notes: non_blank(&self.notes),
            lines,
        };

        Ok(SavePlan { payload, dropped })
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::LineField;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn item(id: ItemId, name: &str, rate: Decimal) -> Item {
        Item {
            item_id: id,
            item_name: name.to_string(),
            description: None,
            sales_rate: rate,
            discount_pct: Some(dec!(5)),
            thumbnail_url: None,
            created_by_user_name: None,
            created_on: None,
        }
    }

    fn persisted_invoice() -> Invoice {
        serde_json::from_value(json!({
            "invoiceID": 42,
            "invoiceNo": "0007",
            "invoiceDate": "2024-03-01T00:00:00",
            "customerName": "Acme Ltd",
            "address": "1 Main St",
            "city": null,
            "taxPercentage": 18,
            "notes": "",
            "lines": [
                {
                    "rowNo": 2, "itemID": 5, "description": "Bolt",
                    "quantity": 10, "rate": 0.25, "discountPct": null
                },
                {
                    "rowNo": 1, "itemID": 4, "description": "Widget",
                    "quantity": 3, "rate": 10, "discountPct": 10
                }
            ],
            "invoiceAmount": 0
        }))
        .unwrap()
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = InvoiceDraft::new(today());

        assert!(draft.is_new());
        assert_eq!(draft.number(), &InvoiceNumber::Pending);
        assert_eq!(draft.tax_percentage(), dec!(10));
        assert_eq!(draft.lines().len(), 1);

        let line = &draft.lines()[0];
        assert_eq!(line.item_id, None);
        assert_eq!(line.quantity, dec!(1));
        assert!(line.rate.is_zero());
        assert_eq!(line.discount_pct, Some(dec!(0)));
    }

    #[test]
    fn test_widget_scenario() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("Acme");
        draft.select_item(0, &item(1, "Widget", dec!(10))).unwrap();
        draft.apply_edit(0, LineEdit::Quantity(dec!(3))).unwrap();
        draft.apply_edit(0, LineEdit::DiscountPct(Some(dec!(10)))).unwrap();

        assert_eq!(draft.lines()[0].amount.cents(), 2700);

        let totals = draft.totals();
        assert_eq!(totals.sub_total.cents(), 2700);
        assert_eq!(totals.tax_amount.cents(), 270);
        assert_eq!(totals.invoice_amount.cents(), 2970);
    }

    #[test]
    fn test_select_item_overwrites_manual_edits() {
        let mut draft = InvoiceDraft::new(today());
        draft.select_item(0, &item(1, "Widget", dec!(10))).unwrap();
        draft
            .apply_edit(0, LineEdit::parse(LineField::Description, "custom text").unwrap())
            .unwrap();
        draft.apply_edit(0, LineEdit::Rate(dec!(0.01))).unwrap();

        draft.select_item(0, &item(2, "Gadget", dec!(25))).unwrap();

        let line = &draft.lines()[0];
        assert_eq!(line.item_id, Some(2));
        assert_eq!(line.description, "Gadget");
        assert_eq!(line.rate, dec!(25));
        assert_eq!(line.amount.cents(), 2500);
    }

    #[test]
    fn test_select_item_keeps_row_discount() {
        let mut draft = InvoiceDraft::new(today());
        draft.select_item(0, &item(1, "Widget", dec!(10))).unwrap();
        assert_eq!(draft.lines()[0].discount_pct, Some(dec!(0)));
    }

    #[test]
    fn test_description_edit_keeps_amount() {
        let mut draft = InvoiceDraft::new(today());
        draft.select_item(0, &item(1, "Widget", dec!(10))).unwrap();
        draft
            .apply_edit(0, LineEdit::Description("Blue widget".into()))
            .unwrap();
        assert_eq!(draft.lines()[0].amount.cents(), 1000);
    }

    #[test]
    fn test_row_out_of_range() {
        let mut draft = InvoiceDraft::new(today());
        let err = draft.select_item(3, &item(1, "Widget", dec!(10))).unwrap_err();
        assert_eq!(err, CoreError::RowOutOfRange { row: 3, len: 1 });
        assert!(draft.remove_row(1).is_err());
    }

    #[test]
    fn test_remove_row_keeps_sibling_ids() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("Acme");
        let second = draft.add_row();
        let third = draft.add_row();
        let first = draft.lines()[0].id;

        for row in 0..3 {
            draft.select_item(row, &item(row as i64 + 1, "Thing", dec!(1))).unwrap();
        }

        let removed = draft.remove_row(1).unwrap();
        assert_eq!(removed.id, second);

        let ids: Vec<LineId> = draft.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first, third]);

        let plan = draft.build_payload().unwrap();
        let row_nos: Vec<u32> = plan.payload.lines.iter().map(|l| l.row_no).collect();
        assert_eq!(row_nos, vec![1, 2]);
        assert_eq!(plan.payload.lines[1].item_id, 3);

        let fourth = draft.add_row();
        assert!(fourth.get() > third.get());
    }

    #[test]
    fn test_payload_drops_rows_without_item() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("Acme");
        draft
            .apply_edit(0, LineEdit::Description("typed but no item".into()))
            .unwrap();
        draft.apply_edit(0, LineEdit::Rate(dec!(99.99))).unwrap();
        draft.add_row();
        draft.select_item(1, &item(7, "Widget", dec!(10))).unwrap();
        draft.add_row();

        let plan = draft.build_payload().unwrap();

        assert_eq!(plan.payload.lines.len(), 1);
        assert_eq!(plan.payload.lines[0].row_no, 1);
        assert_eq!(plan.payload.lines[0].item_id, 7);

        assert_eq!(plan.dropped.len(), 2);
        let discarded: Vec<usize> = plan.discarded_content().map(|d| d.row).collect();
        assert_eq!(discarded, vec![0]);

        assert_eq!(draft.totals().sub_total.cents(), 1000);
    }

    #[test]
    fn test_payload_requires_customer() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("   ");
        assert_eq!(draft.build_payload().unwrap_err(), CoreError::CustomerRequired);
    }

    #[test]
    fn test_payload_shape_for_new_invoice() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("  Acme  ");
        draft.set_city("   ");
        draft.set_number(InvoiceNumber::Preview(8));
        draft.select_item(0, &item(1, "Widget", dec!(10))).unwrap();

        let plan = draft.build_payload().unwrap();
        let json = serde_json::to_value(&plan.payload).unwrap();

        assert!(json.get("invoiceID").is_none());
        assert_eq!(json["invoiceNo"], "0008");
        assert_eq!(json["invoiceDate"], "2024-03-15");
        assert_eq!(json["customerName"], "Acme");
        assert!(json["address"].is_null());
        assert!(json["city"].is_null());
        assert!(json["notes"].is_null());
        assert!(json["lines"][0]["discountPct"].is_null());
        assert_eq!(json["lines"][0]["rowNo"], 1);
    }

    #[test]
    fn test_pending_number_omitted() {
        let mut draft = InvoiceDraft::new(today());
        draft.set_customer_name("Acme");
        let plan = draft.build_payload().unwrap();
        assert_eq!(plan.payload.invoice_no, None);
    }

    #[test]
    fn test_hydrate_defaults() {
        let draft = InvoiceDraft::from_invoice(&persisted_invoice());

        assert_eq!(draft.invoice_id(), Some(42));
        assert!(!draft.is_new());
        assert_eq!(draft.number().display(), "INV-0007");
        assert_eq!(draft.city(), "");
        assert_eq!(draft.tax_percentage(), dec!(18));

        assert_eq!(draft.lines()[0].description, "Widget");
        assert_eq!(draft.lines()[0].amount.cents(), 2700);
        assert_eq!(draft.lines()[1].discount_pct, Some(dec!(0)));
        assert_eq!(draft.lines()[1].amount.cents(), 250);
    }

    #[test]
    fn test_hydrate_missing_tax_and_lines() {
        let invoice: Invoice = serde_json::from_value(json!({
            "invoiceID": 9,
            "invoiceDate": "2024-01-01",
            "customerName": "Solo"
        }))
        .unwrap();

        let draft = InvoiceDraft::from_invoice(&invoice);

        assert_eq!(draft.tax_percentage(), dec!(10));
        assert_eq!(draft.lines().len(), 1);
        assert!(!draft.lines()[0].has_item());
        assert_eq!(draft.number(), &InvoiceNumber::Pending);
    }

    #[test]
    fn test_hydrate_then_save_round_trip() {
        let invoice = persisted_invoice();
        let draft = InvoiceDraft::from_invoice(&invoice);

        let plan = draft.build_payload().unwrap();
        let payload = plan.payload;

        assert_eq!(payload.invoice_id, Some(42));
        assert!(payload.is_update());
        assert_eq!(payload.invoice_no.as_deref(), Some("0007"));
        assert_eq!(payload.customer_name, invoice.customer_name);
        assert_eq!(payload.invoice_date, invoice.invoice_date);
        assert_eq!(Some(payload.tax_percentage), invoice.tax_percentage);
        assert_eq!(payload.address.as_deref(), Some("1 Main St"));
        assert_eq!(payload.notes, None);

        assert_eq!(payload.lines.len(), 2);
        assert_eq!(payload.lines[0].item_id, 4);
        assert_eq!(payload.lines[0].quantity, dec!(3));
        assert_eq!(payload.lines[0].rate, dec!(10));
        assert_eq!(payload.lines[0].discount_pct, Some(dec!(10)));
        assert_eq!(payload.lines[1].item_id, 5);
        assert_eq!(payload.lines[1].discount_pct, None);
        assert!(plan.dropped.is_empty());
    }

    #[test]
    fn test_hydrate_then_save_keeps_sub_cent_rate() {
        let invoice: Invoice = serde_json::from_value(json!({
            "invoiceID": 11,
            "invoiceNo": "0011",
            "invoiceDate": "2024-04-02",
            "customerName": "Acme Ltd",
            "taxPercentage": 0,
            "lines": [
                { "rowNo": 1, "itemID": 3, "description": "Rivet", "quantity": 8, "rate": 1.125 }
            ]
        }))
        .unwrap();

        let draft = InvoiceDraft::from_invoice(&invoice);
        assert_eq!(draft.lines()[0].rate, dec!(1.125));
        assert_eq!(draft.lines()[0].amount.cents(), 900);
        assert_eq!(draft.totals().invoice_amount.cents(), 900);

        let plan = draft.build_payload().unwrap();
        assert_eq!(plan.payload.lines[0].rate, dec!(1.125));

        let json = serde_json::to_value(&plan.payload).unwrap();
        assert_eq!(json["lines"][0]["rate"].as_f64(), Some(1.125));
    }

    #[test]
    fn test_set_tax_percentage_rejects_out_of_range() {
        let mut draft = InvoiceDraft::new(today());
        assert!(draft.set_tax_percentage(dec!(101)).is_err());
        assert_eq!(draft.tax_percentage(), dec!(10));

        draft.set_tax_percentage(dec!(0)).unwrap();
        assert_eq!(draft.tax_percentage(), dec!(0));
    }

    #[test]
    fn test_invoice_number_display() {
        assert_eq!(InvoiceNumber::Preview(1).display(), "INV-0001");
        assert_eq!(InvoiceNumber::Assigned("12".into()).display(), "INV-0012");
        assert_eq!(InvoiceNumber::Assigned("A-9".into()).display(), "A-9");
        assert_eq!(
            InvoiceNumber::Assigned("INV-0012".into()).payload_value().as_deref(),
            Some("0012")
        );
    }

    #[test]
    fn test_invoice_number_payload_value() {
        assert_eq!(InvoiceNumber::Pending.payload_value(), None);
        assert_eq!(
            InvoiceNumber::Preview(8).payload_value().as_deref(),
            Some("0008")
        );
        assert_eq!(
            InvoiceNumber::Assigned(" 0012 ".into()).payload_value().as_deref(),
            Some("0012")
        );
    }
}
