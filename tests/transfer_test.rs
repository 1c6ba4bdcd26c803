mod common;

use common::{empty_pool, seeded_pool, SEEDED_QUESTIONS};
use trivia_api::db::queries::{
    categories::get_all_categories,
    questions::{count_questions, get_all_questions},
};
use trivia_api::transfer::{export_data, import_data};

#[tokio::test]
async fn test_export_then_import_reproduces_rows() -> anyhow::Result<()> {
    let source = seeded_pool().await?;
    let dir = tempfile::tempdir()?;
    let export_dir = dir.path().join("dump");

    export_data(&source, &export_dir).await?;
    assert!(export_dir.join("categories.csv").exists());
    assert!(export_dir.join("questions.csv").exists());

    let target = empty_pool().await?;
    import_data(&target, &export_dir).await?;

    assert_eq!(get_all_categories(&target).await?, get_all_categories(&source).await?);
    assert_eq!(get_all_questions(&target).await?, get_all_questions(&source).await?);
    Ok(())
}

#[tokio::test]
async fn test_import_is_idempotent() -> anyhow::Result<()> {
    let pool = seeded_pool().await?;

    import_data(&pool, &common::seed_dir()).await?;

    assert_eq!(count_questions(&pool).await?, SEEDED_QUESTIONS);
    assert_eq!(get_all_categories(&pool).await?.len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_import_from_missing_dir_fails() -> anyhow::Result<()> {
    let pool = empty_pool().await?;
    let dir = tempfile::tempdir()?;

    let result = import_data(&pool, &dir.path().join("nothing-here")).await;
    assert!(result.is_err());
    assert_eq!(count_questions(&pool).await?, 0);
    Ok(())
}
