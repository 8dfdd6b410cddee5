use cucumber::given;
use fsp_engine::db_types::{Customer, Service};

use crate::cucumber::{lifecycle_world::LifecycleSystem, LifecycleWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut LifecycleWorld) {
    let system = LifecycleSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "customer '{word}' named {string} exists")]
async fn customer_exists(world: &mut LifecycleWorld, id: String, name: String) {
    let email = format!("{id}@example.com");
    let customer = Customer { id: id.into(), name, email, mobile: None };
    world.api().db().upsert_customer(&customer).await.expect("Error saving customer");
}

#[given(expr = "service '{word}' takes {string} processing days")]
async fn service_exists(world: &mut LifecycleWorld, id: String, days: String) {
    let service = Service { id: id.clone().into(), name: format!("Service {id}"), processing_days: Some(days) };
    world.api().db().upsert_service(&service).await.expect("Error saving service");
}
