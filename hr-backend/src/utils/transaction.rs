// src/utils/transaction.rs

//! 評価の保存などを 1 トランザクションで実行する

use crate::error::AppResult;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// `operation` が Ok ならコミット、Err ならロールバックして元のエラーを返す
pub async fn in_transaction<F, R>(db: &DatabaseConnection, operation: F) -> AppResult<R>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, AppResult<R>> + Send,
    R: Send,
{
    let txn = db.begin().await?;

    match operation(&txn).await {
        Ok(value) => {
            txn.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = txn.rollback().await {
                warn!(error = %error, rollback_error = %rollback_error, "Rollback failed");
            }
            Err(error)
        }
    }
}

/// `with_transaction!(db, |txn| async move { ... })`
#[macro_export]
macro_rules! with_transaction {
    ($db:expr, |$txn:ident| $body:expr) => {
        $crate::utils::transaction::in_transaction(&$db, move |$txn| Box::pin($body)).await
    };
}
