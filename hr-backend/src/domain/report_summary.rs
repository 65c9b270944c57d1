// src/domain/report_summary.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `payload.records` の集計結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_records: usize,
    pub average_score: f64,
    pub top_record: Option<Value>,
}

impl ReportSummary {
    pub fn empty() -> Self {
        Self {
            total_records: 0,
            average_score: 0.0,
            top_record: None,
        }
    }

    /// 数値でない・欠けている average_score は 0 として数える。
    /// top_record は average_score 最大のもの（同点なら先勝ち）。
    pub fn from_payload(payload: &Value) -> Self {
        let records = match payload.get("records").and_then(Value::as_array) {
            Some(records) if !records.is_empty() => records,
            _ => return Self::empty(),
        };

        let mut sum = 0.0;
        let mut top: Option<(&Value, f64)> = None;

        for record in records {
            let score = record_score(record);
            sum += score;

            match top {
                Some((_, best)) if best >= score => {}
                _ => top = Some((record, score)),
            }
        }

        Self {
            total_records: records.len(),
            average_score: sum / records.len() as f64,
            top_record: top.map(|(record, _)| record.clone()),
        }
    }
}

fn record_score(record: &Value) -> f64 {
    record
        .get("average_score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
