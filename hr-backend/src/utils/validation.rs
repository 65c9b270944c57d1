// src/utils/validation.rs

//! DTO 共通のバリデーションルール
pub mod common;
