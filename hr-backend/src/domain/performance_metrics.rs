// src/domain/performance_metrics.rs

//! 評価指標（15項目）の定義
//!
//! 各指標は 0〜100 の整数。合計（total_score）は常にこの15項目の和になる。

use serde::{Deserialize, Serialize};

pub const METRIC_MIN: i32 = 0;
pub const METRIC_MAX: i32 = 100;
pub const METRIC_COUNT: usize = 15;
pub const MAX_TOTAL_SCORE: i32 = METRIC_MAX * METRIC_COUNT as i32;

/// 指標名（保存順）
pub const METRIC_NAMES: [&str; METRIC_COUNT] = [
    "communication_skills",
    "multitasking",
    "team_skills",
    "technical_skills",
    "job_knowledge",
    "productivity",
    "creativity",
    "work_quality",
    "professionalism",
    "work_consistency",
    "attitude",
    "cooperation",
    "dependability",
    "attendance",
    "punctuality",
];

/// 範囲外の指標に対するエラーメッセージ
pub fn out_of_range_message(name: &str, value: i32) -> String {
    format!(
        "{}: must be between {} and {} (got {})",
        name, METRIC_MIN, METRIC_MAX, value
    )
}

pub fn is_valid_metric(value: i32) -> bool {
    (METRIC_MIN..=METRIC_MAX).contains(&value)
}

/// 確定した15指標のスコア
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub communication_skills: i32,
    pub multitasking: i32,
    pub team_skills: i32,
    pub technical_skills: i32,
    pub job_knowledge: i32,
    pub productivity: i32,
    pub creativity: i32,
    pub work_quality: i32,
    pub professionalism: i32,
    pub work_consistency: i32,
    pub attitude: i32,
    pub cooperation: i32,
    pub dependability: i32,
    pub attendance: i32,
    pub punctuality: i32,
}

impl PerformanceMetrics {
    /// 全指標を同じ値で埋める
    pub fn uniform(value: i32) -> Self {
        Self::from_values([value; METRIC_COUNT])
    }

    pub fn from_values(values: [i32; METRIC_COUNT]) -> Self {
        Self {
            communication_skills: values[0],
            multitasking: values[1],
            team_skills: values[2],
            technical_skills: values[3],
            job_knowledge: values[4],
            productivity: values[5],
            creativity: values[6],
            work_quality: values[7],
            professionalism: values[8],
            work_consistency: values[9],
            attitude: values[10],
            cooperation: values[11],
            dependability: values[12],
            attendance: values[13],
            punctuality: values[14],
        }
    }

    pub fn values(&self) -> [i32; METRIC_COUNT] {
        [
            self.communication_skills,
            self.multitasking,
            self.team_skills,
            self.technical_skills,
            self.job_knowledge,
            self.productivity,
            self.creativity,
            self.work_quality,
            self.professionalism,
            self.work_consistency,
            self.attitude,
            self.cooperation,
            self.dependability,
            self.attendance,
            self.punctuality,
        ]
    }

    pub fn total(&self) -> i32 {
        self.values().iter().sum()
    }

    /// 範囲外の指標をすべて列挙する（空なら妥当）
    pub fn out_of_range(&self) -> Vec<String> {
        METRIC_NAMES
            .iter()
            .zip(self.values())
            .filter(|(_, value)| !is_valid_metric(*value))
            .map(|(name, value)| out_of_range_message(name, value))
            .collect()
    }

    /// 部分入力を上書き適用した新しい指標を返す
    pub fn merged(&self, scores: &MetricScores) -> Self {
        let current = self.values();
        let supplied = scores.values();
        let mut merged = current;
        for (slot, value) in merged.iter_mut().zip(supplied) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        Self::from_values(merged)
    }
}

/// 入力としての指標（未指定は None）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricScores {
    #[serde(default)]
    pub communication_skills: Option<i32>,
    #[serde(default)]
    pub multitasking: Option<i32>,
    #[serde(default)]
    pub team_skills: Option<i32>,
    #[serde(default)]
    pub technical_skills: Option<i32>,
    #[serde(default)]
    pub job_knowledge: Option<i32>,
    #[serde(default)]
    pub productivity: Option<i32>,
    #[serde(default)]
    pub creativity: Option<i32>,
    #[serde(default)]
    pub work_quality: Option<i32>,
    #[serde(default)]
    pub professionalism: Option<i32>,
    #[serde(default)]
    pub work_consistency: Option<i32>,
    #[serde(default)]
    pub attitude: Option<i32>,
    #[serde(default)]
    pub cooperation: Option<i32>,
    #[serde(default)]
    pub dependability: Option<i32>,
    #[serde(default)]
    pub attendance: Option<i32>,
    #[serde(default)]
    pub punctuality: Option<i32>,
}

impl MetricScores {
    pub fn values(&self) -> [Option<i32>; METRIC_COUNT] {
        [
            self.communication_skills,
            self.multitasking,
            self.team_skills,
            self.technical_skills,
            self.job_knowledge,
            self.productivity,
            self.creativity,
            self.work_quality,
            self.professionalism,
            self.work_consistency,
            self.attitude,
            self.cooperation,
            self.dependability,
            self.attendance,
            self.punctuality,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    /// 指定された値のうち範囲外のものを列挙する
    pub fn out_of_range(&self) -> Vec<String> {
        METRIC_NAMES
            .iter()
            .zip(self.values())
            .filter_map(|(name, value)| match value {
                Some(value) if !is_valid_metric(value) => Some(out_of_range_message(name, value)),
                _ => None,
            })
            .collect()
    }

    /// 未指定を 0 として確定させる
    pub fn to_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics::default().merged(self)
    }
}
