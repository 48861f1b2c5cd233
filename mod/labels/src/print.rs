//! Printable HTML documents for labels. The server renders the document;
//! opening the print dialog is the client's business.

use crate::model::{Label, SanitaryLabel};

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;padding:8mm}\
.label{border:1px solid #000;padding:6mm;width:80mm}\
.label h1{font-size:14pt;margin:0 0 4mm}\
.label p{font-size:10pt;margin:1mm 0}\
.label .code{font-family:monospace;font-size:11pt}";

pub fn render_label(label: &Label) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
<title>Label {code}</title><style>{STYLE}</style></head><body>\
<div class=\"label\">\
<h1>{name}</h1>\
<p class=\"code\">Batch {code}</p>\
<p>Produced: {produced}</p>\
<p>Best before: {expiry}</p>\
<p>Qty: {qty}</p>\
</div></body></html>",
        name = escape(&label.product_name),
        code = escape(&label.batch_code),
        produced = escape(&label.production_date),
        expiry = escape(&label.expiry_date),
        qty = label.quantity,
    )
}

pub fn render_sanitary_label(label: &SanitaryLabel) -> String {
    let batch = label
        .batch_code
        .as_deref()
        .map(|c| format!("<p class=\"code\">Batch {}</p>", escape(c)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
<title>Sanitary label</title><style>{STYLE}</style></head><body>\
<div class=\"label\">\
<h1>{name}</h1>\
{batch}\
<p>Prepared: {prepared}</p>\
<p>Use by: {expiry}</p>\
<p>Responsible: {responsible}</p>\
</div></body></html>",
        name = escape(&label.product_name),
        prepared = escape(&label.prepared_at),
        expiry = escape(&label.expiry_at),
        responsible = escape(&label.responsible),
    )
}
