//! Pruebas contra PostgreSQL real. Requieren DATABASE_URL; sin ella se omiten.

use chrono::NaiveTime;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};

use fleet_tracker::controllers::route_controller::{
    DEFAULT_STOP_LATITUDE, DEFAULT_STOP_LONGITUDE, DEFAULT_STOP_NAME,
};
use fleet_tracker::controllers::{RouteController, StopController, UserController, VehicleController};
use fleet_tracker::database::connection::run_migrations;
use fleet_tracker::dto::route_dto::{CreateRouteRequest, CreateRouteTimeRequest};
use fleet_tracker::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use fleet_tracker::dto::vehicle_dto::{
    ChangeRouteRequest, CreateVehicleRequest, DriverVehicle, RecordLocationRequest,
};
use fleet_tracker::models::{Route, UserResponse, Vehicle};
use fleet_tracker::repositories::{UserRepository, VehicleRepository};

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("⚠️ Skipping test: DATABASE_URL not set");
            return None;
        }
    };
    let pool = PgPool::connect(&url).await.expect("connect");
    run_migrations(&pool).await.expect("migrations");
    Some(pool)
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn create_route(pool: &PgPool) -> Route {
    RouteController::new(pool.clone())
        .create(CreateRouteRequest { name: unique("R"), active: None })
        .await
        .unwrap()
        .data
        .unwrap()
        .route
}

async fn create_vehicle(pool: &PgPool, driver_id: Option<i64>) -> Vehicle {
    VehicleController::new(pool.clone())
        .create(CreateVehicleRequest { name: unique("Bus"), driver_id, active: None })
        .await
        .unwrap()
        .data
        .unwrap()
}

async fn create_driver(pool: &PgPool) -> UserResponse {
    UserController::new(pool.clone())
        .create(CreateUserRequest {
            alias: unique("driver"),
            email: format!("{}@example.com", unique("driver")),
            phone: None,
            user_type: Some("driver".to_string()),
            password: "driver-pass".to_string(),
        })
        .await
        .unwrap()
        .data
        .unwrap()
}

#[tokio::test]
async fn test_create_route_adds_default_stop() {
    let Some(pool) = test_pool().await else { return };

    let created = RouteController::new(pool.clone())
        .create(CreateRouteRequest { name: "R1".to_string(), active: None })
        .await
        .unwrap()
        .data
        .unwrap();

    assert!(created.route.active);
    assert_eq!(created.stops.len(), 1);
    assert_eq!(created.stops[0].name, DEFAULT_STOP_NAME);
    assert_eq!(created.stops[0].latitude, DEFAULT_STOP_LATITUDE);
    assert_eq!(created.stops[0].longitude, DEFAULT_STOP_LONGITUDE);
    assert_eq!(created.stops[0].route_id, created.route.id);
}

#[tokio::test]
async fn test_route_delete_cascades() {
    let Some(pool) = test_pool().await else { return };
    let routes = RouteController::new(pool.clone());
    let vehicles = VehicleController::new(pool.clone());

    let route = create_route(&pool).await;
    routes
        .add_time(route.id, CreateRouteTimeRequest { time: hm(7, 0), active: None })
        .await
        .unwrap();
    let vehicle = create_vehicle(&pool, None).await;
    vehicles.assign_routes(vehicle.id, vec![route.id]).await.unwrap();

    routes.delete(route.id).await.unwrap();

    assert!(StopController::new(pool.clone()).list_by_route(route.id).await.unwrap().is_empty());
    assert!(routes.list_all().await.unwrap().iter().all(|r| r.route.id != route.id));
    let repo = VehicleRepository::new(pool.clone());
    assert!(repo.assignments_for_vehicle(vehicle.id).await.unwrap().is_empty());
    assert!(matches!(routes.get_detail(route.id).await, Err(fleet_tracker::utils::AppError::NotFound(_))));
}

#[tokio::test]
async fn test_vehicle_delete_cascades() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleController::new(pool.clone());

    let route = create_route(&pool).await;
    let vehicle = create_vehicle(&pool, None).await;
    vehicles.assign_routes(vehicle.id, vec![route.id]).await.unwrap();
    vehicles
        .record_location(vehicle.id, RecordLocationRequest { latitude: 10.4, longitude: -64.1 })
        .await
        .unwrap();

    vehicles.delete(vehicle.id).await.unwrap();

    let repo = VehicleRepository::new(pool.clone());
    assert!(repo.assignments_for_vehicle(vehicle.id).await.unwrap().is_empty());
    assert!(repo.find_by_id(vehicle.id).await.unwrap().is_none());
    assert!(repo.latest_location(vehicle.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_assign_routes_is_idempotent() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleController::new(pool.clone());

    let first = create_route(&pool).await;
    let second = create_route(&pool).await;
    let vehicle = create_vehicle(&pool, None).await;

    let inserted = vehicles
        .assign_routes(vehicle.id, vec![first.id, second.id])
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);

    let again = vehicles
        .assign_routes(vehicle.id, vec![first.id, second.id])
        .await
        .unwrap();
    assert!(again.is_empty());

    let nested = vehicles.get_by_id(vehicle.id).await.unwrap();
    assert_eq!(nested.routes.len(), 2);
    assert!(nested.routes.iter().all(|r| r.stops.len() == 1));
}

#[tokio::test]
async fn test_latest_location_is_most_recent_ping() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleController::new(pool.clone());
    let vehicle = create_vehicle(&pool, None).await;

    assert!(vehicles.latest_location(vehicle.id).await.unwrap().is_none());

    let mut last = None;
    for lat in [10.1, 10.2, 10.3] {
        let ping = vehicles
            .record_location(vehicle.id, RecordLocationRequest { latitude: lat, longitude: -64.0 })
            .await
            .unwrap()
            .data
            .unwrap();
        last = Some(ping);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let latest = vehicles.latest_location(vehicle.id).await.unwrap().unwrap();
    assert_eq!(Some(latest.clone()), last);

    let all = vehicles.list_locations(vehicle.id).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], latest);
    assert!(all.iter().all(|p| p.recorded_at <= latest.recorded_at));
}

#[tokio::test]
async fn test_change_and_unassign_route() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleController::new(pool.clone());

    let old_route = create_route(&pool).await;
    let new_route = create_route(&pool).await;
    let vehicle = create_vehicle(&pool, None).await;
    vehicles.assign_routes(vehicle.id, vec![old_route.id]).await.unwrap();

    let changed = vehicles
        .change_route(
            vehicle.id,
            ChangeRouteRequest { old_route_id: old_route.id, new_route_id: new_route.id },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(changed.route_id, new_route.id);

    vehicles.unassign_route(vehicle.id, new_route.id).await.unwrap();
    assert!(vehicles.unassign_route(vehicle.id, new_route.id).await.is_err());

    let without_route = vehicles.list_without_route().await.unwrap();
    assert!(without_route.iter().any(|v| v.id == vehicle.id));
}

#[tokio::test]
async fn test_routes_without_vehicle_complement() {
    let Some(pool) = test_pool().await else { return };
    let routes = RouteController::new(pool.clone());

    let free = create_route(&pool).await;
    let taken = create_route(&pool).await;
    let vehicle = create_vehicle(&pool, None).await;
    VehicleController::new(pool.clone())
        .assign_routes(vehicle.id, vec![taken.id])
        .await
        .unwrap();

    let without = routes.list_without_vehicle().await.unwrap();
    assert!(without.iter().any(|r| r.id == free.id));
    assert!(without.iter().all(|r| r.id != taken.id));
}

#[tokio::test]
async fn test_driver_assignment_views() {
    let Some(pool) = test_pool().await else { return };
    let vehicles = VehicleController::new(pool.clone());
    let driver = create_driver(&pool).await;

    match vehicles.get_by_driver(driver.id).await.unwrap() {
        DriverVehicle::Unassigned(indicator) => {
            assert!(!indicator.success);
            assert!(indicator.vehicle.is_none());
        }
        other => panic!("expected unassigned indicator, got {:?}", other),
    }
    let free = vehicles.list_drivers_without_vehicle().await.unwrap();
    assert!(free.iter().any(|d| d.id == driver.id));

    let vehicle = create_vehicle(&pool, Some(driver.id)).await;
    assert!(matches!(
        vehicles.get_by_driver(driver.id).await.unwrap(),
        DriverVehicle::Assigned(ref v) if v.vehicle.id == vehicle.id
    ));
    let free = vehicles.list_drivers_without_vehicle().await.unwrap();
    assert!(free.iter().all(|d| d.id != driver.id));

    let unassigned = vehicles.unassign_driver(vehicle.id).await.unwrap().data.unwrap();
    assert_eq!(unassigned.driver_id, None);
}

#[tokio::test]
async fn test_route_detail_nesting() {
    let Some(pool) = test_pool().await else { return };
    let routes = RouteController::new(pool.clone());
    let vehicles = VehicleController::new(pool.clone());

    let route = create_route(&pool).await;
    for at in [hm(18, 0), hm(6, 30), hm(12, 15)] {
        routes
            .add_time(route.id, CreateRouteTimeRequest { time: at, active: None })
            .await
            .unwrap();
    }
    let driver = create_driver(&pool).await;
    let with_driver = create_vehicle(&pool, Some(driver.id)).await;
    let without_ping = create_vehicle(&pool, None).await;
    vehicles.assign_routes(with_driver.id, vec![route.id]).await.unwrap();
    vehicles.assign_routes(without_ping.id, vec![route.id]).await.unwrap();
    vehicles
        .record_location(with_driver.id, RecordLocationRequest { latitude: 10.45, longitude: -64.17 })
        .await
        .unwrap();

    let detail = routes.get_detail(route.id).await.unwrap();

    let times: Vec<NaiveTime> = detail.times.iter().map(|t| t.time).collect();
    assert_eq!(times, vec![hm(6, 30), hm(12, 15), hm(18, 0)]);
    assert_eq!(detail.stops.len(), 1);
    assert_eq!(detail.vehicles.len(), 2);
    assert_eq!(detail.vehicles[0].vehicle.id, with_driver.id);
    assert_eq!(detail.vehicles[0].driver.as_ref().map(|d| d.id), Some(driver.id));
    assert!(detail.vehicles[0].location.is_some());
    assert!(detail.vehicles[1].driver.is_none());
    assert!(detail.vehicles[1].location.is_none());
}

#[tokio::test]
async fn test_account_credentials_are_hashed() {
    let Some(pool) = test_pool().await else { return };
    let users = UserController::new(pool.clone());
    let email = format!("{}@example.com", unique("ana"));

    let created = users
        .create(CreateUserRequest {
            alias: "ana".to_string(),
            email: email.clone(),
            phone: Some("+58 412 0000000".to_string()),
            user_type: None,
            password: "first-pass".to_string(),
        })
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(created.user_type, "passenger");

    let repo = UserRepository::new(pool.clone());
    let stored = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "first-pass");
    assert!(bcrypt::verify("first-pass", &stored.password_hash).unwrap());

    users
        .update(
            created.id,
            UpdateUserRequest { password: Some("second-pass".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
    let stored = repo.find_by_email(&email).await.unwrap().unwrap();
    assert!(bcrypt::verify("second-pass", &stored.password_hash).unwrap());
    assert_eq!(stored.phone.as_deref(), Some("+58 412 0000000"));

    assert_eq!(users.find_by_email(&email).await.map(|u| u.id), Some(created.id));
    users.delete(created.id).await.unwrap();
    assert!(users.find_by_email(&email).await.is_none());
}
