#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use weft_sync::{
    CatalogStore, DeploymentStore, HandlerMeta, HandlerRegistry, MemoryCatalog, ProtocolHandler,
    SyncConfig, SyncEngine, SyncError, SyncResult,
};
use weft_types::{
    Deployment, Network, NetworkId, NetworkType, NetworkTypeId, ProtocolId, META_REMOTE_ID,
};
use weft_vault::VaultStore;

/// Scriptable protocol handler that records every call.
pub struct RecordingHandler {
    connect_calls: AtomicUsize,
    test_calls: AtomicUsize,
    sync_calls: AtomicUsize,
    pull_calls: AtomicUsize,
    /// Number of upcoming sync calls that fail before succeeding again.
    fail_syncs: AtomicUsize,
    fail_connect: AtomicBool,
    /// Sync calls against this network always fail.
    fail_network: Mutex<Option<NetworkId>>,
    /// Credentials observed on the most recent sync call.
    last_security_data: Mutex<Option<String>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            connect_calls: AtomicUsize::new(0),
            test_calls: AtomicUsize::new(0),
            sync_calls: AtomicUsize::new(0),
            pull_calls: AtomicUsize::new(0),
            fail_syncs: AtomicUsize::new(0),
            fail_connect: AtomicBool::new(false),
            fail_network: Mutex::new(None),
            last_security_data: Mutex::new(None),
        })
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn test_calls(&self) -> usize {
        self.test_calls.load(Ordering::SeqCst)
    }

    pub fn sync_calls(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }

    pub fn pull_calls(&self) -> usize {
        self.pull_calls.load(Ordering::SeqCst)
    }

    /// Makes the next `n` sync calls fail.
    pub fn fail_next_syncs(&self, n: usize) {
        self.fail_syncs.store(n, Ordering::SeqCst);
    }

    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Makes every sync call against the given network fail.
    pub fn set_fail_network(&self, network_id: Option<NetworkId>) {
        *self.fail_network.lock().unwrap() = network_id;
    }

    pub fn last_security_data(&self) -> Option<String> {
        self.last_security_data.lock().unwrap().clone()
    }

    fn sync(&self, network: &Network, deployment: &Deployment) -> SyncResult<HandlerMeta> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_security_data.lock().unwrap() = network.security_data.clone();

        if *self.fail_network.lock().unwrap() == Some(network.id) {
            return Err(SyncError::Handler(format!(
                "backend {} rejected the request",
                network.name
            )));
        }
        let pending_failures = self.fail_syncs.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.fail_syncs.store(pending_failures - 1, Ordering::SeqCst);
            return Err(SyncError::Handler("backend unavailable".to_string()));
        }

        let mut meta = HandlerMeta::new();
        meta.insert(
            META_REMOTE_ID.to_string(),
            format!("remote-{}", deployment.resource.id_string()).into(),
        );
        Ok(meta)
    }
}

#[async_trait]
impl ProtocolHandler for RecordingHandler {
    fn protocol_name(&self) -> &'static str {
        "recording"
    }

    async fn connect(&self, _network: &Network) -> SyncResult<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(SyncError::Handler("connection refused".to_string()));
        }
        Ok(())
    }

    async fn test(&self, _network: &Network) -> SyncResult<()> {
        self.test_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sync_application(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta> {
        self.sync(network, deployment)
    }

    async fn sync_device(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta> {
        self.sync(network, deployment)
    }

    async fn sync_device_profile(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta> {
        self.sync(network, deployment)
    }

    async fn pull_network(&self, _network: &Network) -> SyncResult<()> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// An engine over in-memory stores with one recording handler registered.
pub struct TestEnv {
    pub engine: SyncEngine,
    pub catalog: Arc<MemoryCatalog>,
    pub handler: Arc<RecordingHandler>,
    pub network_type: NetworkTypeId,
    pub protocol: ProtocolId,
}

/// Engine logs show up with RUST_LOG set; repeated init attempts are fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn make_env() -> TestEnv {
    make_env_with_config(SyncConfig::default())
}

pub fn make_env_with_config(config: SyncConfig) -> TestEnv {
    init_tracing();
    let catalog = Arc::new(MemoryCatalog::new());
    let handler = RecordingHandler::new();
    let protocol = ProtocolId::new("recording");

    let mut registry = HandlerRegistry::new();
    registry.register(protocol.clone(), handler.clone());

    let engine = SyncEngine::with_config(
        catalog.clone() as Arc<dyn CatalogStore>,
        Arc::new(DeploymentStore::open_in_memory().unwrap()),
        Arc::new(VaultStore::open_in_memory().unwrap()),
        Arc::new(registry),
        config,
    );

    TestEnv {
        engine,
        catalog,
        handler,
        network_type: NetworkType::new("test fleet").id,
        protocol,
    }
}

impl TestEnv {
    /// Creates a network through the engine (key issued, credentials sealed).
    pub async fn add_network(
        &self,
        name: &str,
        authorized: bool,
        credentials: Option<&str>,
    ) -> Network {
        let mut network = Network::new(
            name,
            "https://backend.example",
            self.network_type,
            self.protocol.clone(),
        );
        network.authorized = authorized;
        network.security_data = credentials.map(str::to_string);
        self.engine.create_network(network).await.unwrap()
    }
}
