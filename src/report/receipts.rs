// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Accounting ledger PDF: a transaction table per period followed by the
//! period's receipts, four to a page.

use super::ensure_any;
use crate::error::ReportError;
use crate::ledger::Flow;
use crate::models::Transaction;
use crate::periods::{bucketize, Period};
use crate::utils::format_number;
use chrono::NaiveDate;
use log::warn;
use printpdf::image_crate::{self, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::BufWriter;

pub const NO_RECEIPT: &str = "No Receipt";
pub const NO_RECEIPT_IMAGE: &str = "No Receipt Image";
pub const EMPTY_PERIOD: &str = "No transactions during this period.";
pub const RECEIPTS_PER_PAGE: usize = 4;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const ROW_H: f32 = 6.0;
const BOTTOM: f32 = 15.0;
const COLUMNS: [(&str, f32); 6] = [
    ("Date", 10.0),
    ("Branch", 34.0),
    ("Income", 104.0),
    ("Outcome", 130.0),
    ("Balance", 156.0),
    ("Receipt", 182.0),
];

#[derive(Debug, Clone)]
pub struct LedgerRow<'a> {
    pub tx: &'a Transaction,
    pub balance: Decimal,
    /// Sequential across the whole document; `None` prints "No Receipt".
    pub reference: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LedgerPage<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<LedgerRow<'a>>,
    pub totals: Flow,
}

impl LedgerPage<'_> {
    pub fn receipts(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.rows
            .iter()
            .filter_map(|r| r.reference.map(|n| (n, r.tx.tid)))
    }
}

#[derive(Debug, Clone)]
pub struct LedgerPlan<'a> {
    pub pages: Vec<LedgerPage<'a>>,
}

impl LedgerPlan<'_> {
    /// Transactions whose receipt images must be fetched, in reference order.
    pub fn receipt_tids(&self) -> Vec<i64> {
        self.pages
            .iter()
            .flat_map(|p| p.receipts().map(|(_, tid)| tid))
            .collect()
    }
}

pub fn plan(
    txs: &[Transaction],
    begin: NaiveDate,
    end: NaiveDate,
    period: Period,
) -> Result<LedgerPlan<'_>, ReportError> {
    ensure_any(txs)?;
    let bucketed = bucketize(txs, begin, end, period)?;
    let mut next_ref = 1;
    let pages = bucketed
        .buckets
        .into_iter()
        .map(|b| {
            let mut totals = Flow::default();
            let rows = b
                .transactions
                .into_iter()
                .map(|t| {
                    totals.add(t);
                    let reference = if t.has_receipt() {
                        next_ref += 1;
                        Some(next_ref - 1)
                    } else {
                        None
                    };
                    LedgerRow {
                        tx: t,
                        balance: totals.balance(),
                        reference,
                    }
                })
                .collect();
            LedgerPage {
                start: b.start,
                end: b.end,
                rows,
                totals,
            }
        })
        .collect();
    Ok(LedgerPlan { pages })
}

/// `images` maps tid to the raw receipt bytes fetched from the backend.
/// Missing or undecodable images get a placeholder. `font` is an optional
/// TrueType font used for all text; without it the builtin Helvetica is
/// used and characters outside Latin-1 print as `?`.
pub fn render(
    plan: &LedgerPlan<'_>,
    images: &HashMap<i64, Vec<u8>>,
    font: Option<&[u8]>,
) -> Result<Vec<u8>, ReportError> {
    if plan.pages.is_empty() {
        return Err(ReportError::NoTransactions);
    }
    let (doc, page1, layer1) = PdfDocument::new("Accounting Ledger", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let fonts = load_fonts(&doc, font)?;
    let mut layer = doc.get_page(page1).get_layer(layer1);
    for (i, page) in plan.pages.iter().enumerate() {
        if i > 0 {
            layer = new_page(&doc);
        }
        layer = draw_table(&doc, layer, &fonts, page);

        let receipts: Vec<(usize, i64)> = page.receipts().collect();
        for chunk in receipts.chunks(RECEIPTS_PER_PAGE) {
            layer = new_page(&doc);
            for (slot, (reference, tid)) in chunk.iter().enumerate() {
                draw_receipt(&layer, &fonts, slot, *reference, images.get(tid));
            }
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

struct Fonts {
    font: IndirectFontRef,
    bold: IndirectFontRef,
    unicode: bool,
}

fn load_fonts(doc: &PdfDocumentReference, external: Option<&[u8]>) -> Result<Fonts, ReportError> {
    match external {
        Some(bytes) => {
            let f = doc
                .add_external_font(bytes)
                .map_err(|e| ReportError::Pdf(e.to_string()))?;
            Ok(Fonts {
                font: f.clone(),
                bold: f,
                unicode: true,
            })
        }
        None => Ok(Fonts {
            font: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| ReportError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| ReportError::Pdf(e.to_string()))?,
            unicode: false,
        }),
    }
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None))
}

fn primary() -> Color {
    rgb(0x4a, 0x90, 0xe2)
}

fn dark() -> Color {
    rgb(50, 50, 50)
}

fn hline(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(10.0), Mm(y)), false),
            (Point::new(Mm(PAGE_W - 10.0), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn boxed(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        is_closed: true,
    });
}

// Builtin fonts only cover Latin-1.
fn pdf_text(s: &str, max_chars: usize, unicode: bool) -> String {
    let chars: Vec<char> = s
        .chars()
        .map(|c| {
            if c.is_control() || (!unicode && (c as u32) >= 0x100) {
                '?'
            } else {
                c
            }
        })
        .collect();
    if chars.len() <= max_chars {
        return chars.into_iter().collect();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = chars[..keep].iter().collect();
    out.push_str("...");
    out
}

fn draw_header_row(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    layer.set_fill_color(primary());
    for (title, x) in COLUMNS {
        layer.use_text(title, 11.0, Mm(x), Mm(y), &fonts.bold);
    }
    layer.set_outline_color(primary());
    hline(layer, y - 2.0);
    layer.set_fill_color(dark());
}

fn draw_table(
    doc: &PdfDocumentReference,
    mut layer: PdfLayerReference,
    fonts: &Fonts,
    page: &LedgerPage<'_>,
) -> PdfLayerReference {
    layer.set_fill_color(primary());
    let title = format!("Transactions from {} to {}", page.start, page.end);
    layer.use_text(title, 18.0, Mm(40.0), Mm(PAGE_H - 13.0), &fonts.bold);
    layer.set_outline_color(primary());
    layer.set_outline_thickness(2.0);
    hline(&layer, PAGE_H - 18.0);
    layer.set_outline_thickness(0.5);

    if page.rows.is_empty() {
        layer.set_fill_color(dark());
        layer.use_text(EMPTY_PERIOD, 12.0, Mm(10.0), Mm(PAGE_H - 30.0), &fonts.font);
        return layer;
    }

    let mut y = PAGE_H - 30.0;
    draw_header_row(&layer, fonts, y);
    y -= ROW_H + 1.0;

    let mut lines: Vec<([String; 6], bool)> = page
        .rows
        .iter()
        .map(|r| {
            (
                [
                    r.tx.date.to_string(),
                    pdf_text(&r.tx.branch, 38, fonts.unicode),
                    format_number(&r.tx.income()),
                    format_number(&r.tx.outcome()),
                    format_number(&r.balance),
                    r.reference
                        .map_or_else(|| NO_RECEIPT.to_string(), |n| n.to_string()),
                ],
                false,
            )
        })
        .collect();
    lines.push((
        [
            "Total".to_string(),
            String::new(),
            format_number(&page.totals.income),
            format_number(&page.totals.outcome),
            format_number(&page.totals.balance()),
            String::new(),
        ],
        true,
    ));

    for (cells, is_total) in lines {
        if y < BOTTOM {
            layer = new_page(doc);
            y = PAGE_H - 20.0;
            draw_header_row(&layer, fonts, y);
            y -= ROW_H + 1.0;
        }
        let font = if is_total { &fonts.bold } else { &fonts.font };
        for ((_, x), text) in COLUMNS.iter().zip(cells.iter()) {
            layer.use_text(text.as_str(), 10.0, Mm(*x), Mm(y), font);
        }
        y -= ROW_H;
    }
    layer
}

fn draw_receipt(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    slot: usize,
    reference: usize,
    bytes: Option<&Vec<u8>>,
) {
    // Grid geometry measured from the top-left, converted to PDF space below.
    let x = (slot % 2) as f32 * (PAGE_W / 2.0) + 10.0;
    let top = (slot / 2) as f32 * (PAGE_H / 2.0) + 20.0;
    let max_w = PAGE_W / 2.0 - 20.0;
    let max_h = PAGE_H / 2.0 - 30.0;

    let decoded = bytes.and_then(|b| match image_crate::load_from_memory(b) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("receipt #{} could not be decoded: {}", reference, e);
            None
        }
    });

    let Some(img) = decoded else {
        layer.set_fill_color(rgb(100, 100, 100));
        layer.use_text(NO_RECEIPT_IMAGE, 12.0, Mm(x + 20.0), Mm(PAGE_H - (top + max_h / 2.0)), &fonts.font);
        return;
    };

    layer.set_outline_color(rgb(200, 200, 200));
    boxed(layer, x, PAGE_H - (top + max_h + 10.0), max_w + 20.0, max_h + 20.0);
    layer.set_fill_color(primary());
    layer.use_text(
        format!("Receipt #{}", reference),
        12.0,
        Mm(x + 5.0),
        Mm(PAGE_H - (top - 2.0)),
        &fonts.font,
    );

    let (px_w, px_h) = GenericImageView::dimensions(&img);
    if px_w == 0 || px_h == 0 {
        return;
    }
    let ratio = (max_w / px_w as f32).min(max_h / px_h as f32);
    let w = px_w as f32 * ratio;
    let h = px_h as f32 * ratio;
    let left = x + (max_w - w) / 2.0;
    let img_top = top + (max_h - h) / 2.0 + 10.0;

    // At `dpi`, one pixel is 25.4 / dpi millimetres.
    let dpi = 300.0_f32;
    let natural_w = px_w as f32 * 25.4 / dpi;
    let scale = w / natural_w;
    let rgb_img = image_crate::DynamicImage::ImageRgb8(img.to_rgb8());
    Image::from_dynamic_image(&rgb_img).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(left)),
            translate_y: Some(Mm(PAGE_H - (img_top + h))),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
