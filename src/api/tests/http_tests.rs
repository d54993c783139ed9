use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct StoreState {
    foods: Arc<Mutex<Vec<FoodItem>>>,
    next_id: Arc<Mutex<FoodId>>,
    created_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    fail_all: Arc<Mutex<bool>>,
}

async fn list_foods(State(state): State<StoreState>) -> Result<Json<Vec<FoodItem>>, StatusCode> {
    if *state.fail_all.lock().unwrap() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.foods.lock().unwrap().clone()))
}

async fn create_food(
    State(state): State<StoreState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<FoodItem>), StatusCode> {
    state.created_bodies.lock().unwrap().push(body.clone());
    let new: NewFoodItem =
        serde_json::from_value(body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
    let id = {
        let mut next = state.next_id.lock().unwrap();
        *next += 1;
        *next
    };
    let item = FoodItem {
        id,
        name: new.name,
        description: new.description,
        price: new.price,
        available: new.available,
        image: new.image,
    };
    state.foods.lock().unwrap().push(item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_food(
    State(state): State<StoreState>,
    Path(id): Path<FoodId>,
    Json(body): Json<FoodItem>,
) -> Result<Json<FoodItem>, StatusCode> {
    let mut foods = state.foods.lock().unwrap();
    let slot = foods
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = FoodItem { id, ..body };
    Ok(Json(slot.clone()))
}

async fn delete_food(State(state): State<StoreState>, Path(id): Path<FoodId>) -> StatusCode {
    let mut foods = state.foods.lock().unwrap();
    let before = foods.len();
    foods.retain(|f| f.id != id);
    if foods.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn spawn_store(seed: Vec<FoodItem>, base_path: &str) -> (String, StoreState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = StoreState {
        next_id: Arc::new(Mutex::new(seed.iter().map(|f| f.id).max().unwrap_or(0))),
        foods: Arc::new(Mutex::new(seed)),
        ..Default::default()
    };
    let foods = Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", put(update_food).delete(delete_food))
        .with_state(state.clone());
    let app = if base_path.is_empty() {
        foods
    } else {
        Router::new().nest(base_path, foods)
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}{base_path}"), state)
}

fn client(base_url: String) -> HttpFoodsApi {
    HttpFoodsApi::new(&ClientConfig {
        base_url,
        request_timeout: Duration::from_secs(5),
        user_agent: "food-dashboard-tests".into(),
    })
    .expect("client")
}

fn food(id: FoodId, name: &str) -> FoodItem {
    FoodItem {
        id,
        name: name.into(),
        description: format!("{name} description"),
        price: "10.00".into(),
        available: true,
        image: format!("https://img.example/{id}.png"),
    }
}

#[tokio::test]
async fn list_returns_foods_in_server_order() {
    let seed = vec![food(3, "Soup"), food(1, "Pizza"), food(2, "Pasta")];
    let (url, _) = spawn_store(seed.clone(), "").await;

    let foods = client(url).list().await.expect("list");
    assert_eq!(foods, seed);
}

#[tokio::test]
async fn create_posts_body_and_returns_assigned_id() {
    let (url, state) = spawn_store(vec![food(4, "Pizza")], "").await;
    let new = NewFoodItem {
        name: "Soup".into(),
        description: "Hot".into(),
        price: "7.50".into(),
        available: true,
        image: String::new(),
    };

    let created = client(url).create(&new).await.expect("create");
    assert_eq!(created.id, 5);
    assert_eq!(created.name, "Soup");

    let bodies = state.created_bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].get("id").is_none());
    assert_eq!(bodies[0]["available"], serde_json::Value::Bool(true));
}

#[tokio::test]
async fn update_puts_to_item_path() {
    let (url, state) = spawn_store(vec![food(1, "Pizza"), food(2, "Pasta")], "").await;
    let mut changed = food(2, "Pasta");
    changed.price = "12.00".into();

    let updated = client(url).update(&changed).await.expect("update");
    assert_eq!(updated, changed);
    assert_eq!(state.foods.lock().unwrap()[1].price, "12.00");
}

#[tokio::test]
async fn delete_removes_item_and_missing_item_is_error() {
    let (url, state) = spawn_store(vec![food(1, "Pizza")], "").await;
    let api = client(url);

    api.delete(1).await.expect("delete");
    assert!(state.foods.lock().unwrap().is_empty());

    let err = api.delete(1).await.expect_err("second delete must fail");
    match err {
        ApiError::Status { status, .. } => assert_eq!(status, reqwest::StatusCode::NOT_FOUND),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn base_path_is_preserved() {
    let (url, _) = spawn_store(vec![food(1, "Pizza")], "/api").await;
    let foods = client(url).list().await.expect("list under base path");
    assert_eq!(foods.len(), 1);
}

#[tokio::test]
async fn server_error_is_reported_as_status() {
    let (url, state) = spawn_store(vec![food(1, "Pizza")], "").await;
    *state.fail_all.lock().unwrap() = true;

    let err = client(url).list().await.expect_err("list must fail");
    assert!(matches!(err, ApiError::Status { .. }));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = HttpFoodsApi::new(&ClientConfig {
        base_url: "not a url".into(),
        request_timeout: Duration::from_secs(1),
        user_agent: "t".into(),
    })
    .err()
    .expect("must fail");
    assert!(matches!(err, ApiError::InvalidUrl { .. }));
}
