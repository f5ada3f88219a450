mod common;

use common::{make_env, make_env_with_config};
use weft_sync::SyncConfig;
use weft_types::{
    Application, Device, DeviceProfile, NetworkTypeId, ResourceRef, SyncStatus,
};

#[tokio::test]
async fn push_creates_deployments_for_whole_catalog() {
    let env = make_env();
    let network = env.add_network("n1", true, None).await;

    let app = Application::new("app", env.network_type);
    let profile = DeviceProfile::new("profile", env.network_type);
    let device = Device::new("device", app.id, profile.id);
    env.catalog.insert_application(app.clone()).await;
    env.catalog.insert_device_profile(profile.clone()).await;
    env.catalog.insert_device(device.clone()).await;

    // A resource of some other type must not be touched.
    let foreign = Application::new("foreign", NetworkTypeId::new());
    env.catalog.insert_application(foreign.clone()).await;

    env.engine.push_network(&network).await.unwrap();

    let records = env.engine.list_network_deployments(&network.id).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|d| d.status == SyncStatus::Created));

    let resources: Vec<ResourceRef> = records.iter().map(|d| d.resource).collect();
    assert!(resources.contains(&ResourceRef::Application(app.id)));
    assert!(resources.contains(&ResourceRef::DeviceProfile(profile.id)));
    assert!(resources.contains(&ResourceRef::Device(device.id)));
    assert!(!resources.contains(&ResourceRef::Application(foreign.id)));
}

#[tokio::test]
async fn push_flags_pending_records_back_to_updated() {
    let env = make_env();
    let network = env.add_network("n1", true, None).await;
    let app = Application::new("app", env.network_type);
    env.catalog.insert_application(app.clone()).await;

    // A record that failed earlier sits in Created with sticky failure state.
    let deployment = env
        .engine
        .create_deployment(ResourceRef::Application(app.id), network.id, SyncStatus::Created)
        .unwrap();

    env.engine.push_network(&network).await.unwrap();

    let reloaded = env.engine.load_deployment(&deployment.id).unwrap();
    assert_eq!(reloaded.status, SyncStatus::Updated);
}

#[tokio::test]
async fn push_leaves_synced_records_alone() {
    let env = make_env();
    let network = env.add_network("n1", true, None).await;
    let app = Application::new("app", env.network_type);
    env.catalog.insert_application(app.clone()).await;

    let deployment = env
        .engine
        .create_deployment(ResourceRef::Application(app.id), network.id, SyncStatus::Synced)
        .unwrap();

    env.engine.push_network(&network).await.unwrap();

    let reloaded = env.engine.load_deployment(&deployment.id).unwrap();
    assert_eq!(reloaded.status, SyncStatus::Synced);
}

#[tokio::test]
async fn push_never_duplicates_the_pair() {
    let env = make_env();
    let network = env.add_network("n1", true, None).await;
    let app = Application::new("app", env.network_type);
    let profile = DeviceProfile::new("profile", env.network_type);
    // The device is reachable through both the application walk and the
    // profile walk; it must still end up with a single record.
    let device = Device::new("device", app.id, profile.id);
    env.catalog.insert_application(app).await;
    env.catalog.insert_device_profile(profile).await;
    env.catalog.insert_device(device.clone()).await;

    env.engine.push_network(&network).await.unwrap();
    env.engine.push_network(&network).await.unwrap();

    let records = env.engine.list_network_deployments(&network.id).unwrap();
    let device_records = records
        .iter()
        .filter(|d| d.resource == ResourceRef::Device(device.id))
        .count();
    assert_eq!(device_records, 1);
}

#[tokio::test]
async fn push_walks_every_page() {
    let env = make_env_with_config(SyncConfig {
        page_size: 2,
        ..SyncConfig::default()
    });
    let network = env.add_network("n1", true, None).await;

    for i in 0..5 {
        env.catalog
            .insert_application(Application::new(format!("app-{i}"), env.network_type))
            .await;
    }

    env.engine.push_applications(&network).await.unwrap();

    let records = env.engine.list_network_deployments(&network.id).unwrap();
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn push_device_flags_one_pair() {
    let env = make_env();
    let network = env.add_network("n1", true, None).await;
    let app = Application::new("app", env.network_type);
    let profile = DeviceProfile::new("profile", env.network_type);
    let device = Device::new("device", app.id, profile.id);

    let id = env.engine.push_device(&network, &device).unwrap();
    let record = env.engine.load_deployment(&id).unwrap();
    assert_eq!(record.resource, ResourceRef::Device(device.id));
    assert_eq!(record.status, SyncStatus::Created);

    // Flagging again reuses the same record.
    let again = env.engine.push_device(&network, &device).unwrap();
    assert_eq!(again, id);
}

#[tokio::test]
async fn push_is_flag_only() {
    let env = make_env();
    let network = env.add_network("n1", true, Some("{\"apiKey\":\"k\"}")).await;
    env.catalog
        .insert_application(Application::new("app", env.network_type))
        .await;

    env.engine.push_network(&network).await.unwrap();

    // Flagging must not call the backend; reconciliation is a separate pass.
    assert_eq!(env.handler.sync_calls(), 0);
}
