use std::sync::Arc;
use std::time::Duration;

use tasksync::sea_orm::ConnectionTrait;
use tasksync::{
    DataGateway, NewTask, RemoteError, SeaOrmGateway, TaskBoard, TaskPatch, WriteKind,
};

async fn connect() -> SeaOrmGateway {
    SeaOrmGateway::connect("sqlite::memory:")
        .await
        .expect("Failed to create SeaOrmGateway")
}

#[tokio::test]
async fn test_sql_gateway_basic_crud() {
    let db = connect().await;

    // INSERT
    let inserted = db
        .insert(NewTask::new("Buy milk", "").unwrap())
        .await
        .expect("Failed to insert")
        .expect("created record");
    assert_eq!(inserted.title, "Buy milk");
    assert_eq!(inserted.description, "");
    assert!(!inserted.completed);
    assert!(!inserted.id.is_empty());

    // SELECT all
    let all = db.query_all().await.expect("Failed to query");
    assert_eq!(all, vec![inserted.clone()]);

    // UPDATE
    db.update(&inserted.id, TaskPatch::completed(true))
        .await
        .expect("Failed to update");
    let all = db.query_all().await.expect("Failed to query");
    assert!(all[0].completed);
    assert_eq!(all[0].created_at, inserted.created_at);

    // DELETE
    db.delete(&inserted.id).await.expect("Failed to delete");
    let all_after_delete = db.query_all().await.expect("Failed to query");
    assert!(all_after_delete.is_empty());
}

#[tokio::test]
async fn test_sql_gateway_orders_newest_first() {
    let db = connect().await;
    for title in ["first", "second", "third"] {
        db.insert(NewTask::new(title, "").unwrap()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let titles: Vec<_> = db
        .query_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn test_sql_gateway_update_missing_row() {
    let db = connect().await;
    let err = db
        .update("no-such-id", TaskPatch::completed(true))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(id) if id == "no-such-id"));

    let err = db.update("no-such-id", TaskPatch::default()).await.unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(_)));
}

#[tokio::test]
async fn test_sql_gateway_update_existing_row_without_change() {
    let db = connect().await;
    let task = db
        .insert(NewTask::new("Water plants", "").unwrap())
        .await
        .unwrap()
        .unwrap();

    // Writing the value the row already holds still finds the row.
    db.update(&task.id, TaskPatch::completed(false))
        .await
        .expect("same-value update");
    db.update(&task.id, TaskPatch::default())
        .await
        .expect("empty patch on existing row");

    let all = db.query_all().await.unwrap();
    assert_eq!(all, vec![task]);
}

#[tokio::test]
async fn test_sql_gateway_table_created() {
    let db = connect().await;
    let result = db
        .inner()
        .execute_unprepared("SELECT count(*) FROM tasks")
        .await;
    assert!(result.is_ok(), "tasks table should exist");
}

#[tokio::test]
async fn test_sql_gateway_change_notifications() {
    let db = connect().await;

    // Subscribe to changes before writing
    let mut rx = db.subscribe().await.expect("subscribe");

    let task = db
        .insert(NewTask::new("Test notification", "").unwrap())
        .await
        .unwrap()
        .unwrap();
    db.update(&task.id, TaskPatch::completed(true)).await.unwrap();
    db.delete(&task.id).await.unwrap();

    let kinds: Vec<_> = (0..3)
        .map(|_| rx.try_recv().expect("notification"))
        .inspect(|n| {
            assert_eq!(n.table, "tasks");
            assert_eq!(n.primary_key, task.id);
        })
        .map(|n| n.kind)
        .collect();
    assert_eq!(kinds, [WriteKind::Insert, WriteKind::Update, WriteKind::Delete]);
}

#[tokio::test]
async fn test_board_over_sql_gateway() {
    let gateway = Arc::new(connect().await);
    let board = TaskBoard::new(gateway.clone());
    board.load().await.expect("load");
    assert!(board.tasks().is_empty());

    board.add("Write report", "due Friday").await.unwrap();
    let task = board.tasks()[0].clone();
    board.toggle(&task.id, task.completed).await.unwrap();
    assert!(board.tasks()[0].completed);

    board.remove(&task.id).await.unwrap();
    assert!(board.tasks().is_empty());
    assert!(gateway.query_all().await.unwrap().is_empty());
}
