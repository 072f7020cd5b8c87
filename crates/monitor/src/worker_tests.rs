use super::*;
use lcm_core::object::{ObjectClass, ObjectKey};
use lcm_core::power::Sockaddr;

fn device() -> PowerDevice {
    PowerDevice {
        object: ObjectKey::new(ObjectClass::PowerDevice, "1"),
        sockaddr: Sockaddr::new("pdu", 23),
    }
}

struct AlwaysAvailable;

#[async_trait]
impl PowerDeviceManager for AlwaysAvailable {
    async fn dispatch(&self, _device: &PowerDevice, _task: &str, _kwargs: serde_json::Value) -> Result<(), MonitorError> {
        Ok(())
    }
    async fn check_availability(&self, _device: &PowerDevice) -> bool {
        true
    }
}

struct AlwaysUnavailable;

#[async_trait]
impl PowerDeviceManager for AlwaysUnavailable {
    async fn dispatch(&self, _device: &PowerDevice, _task: &str, _kwargs: serde_json::Value) -> Result<(), MonitorError> {
        Ok(())
    }
    async fn check_availability(&self, _device: &PowerDevice) -> bool {
        false
    }
}

struct DeviceGone;

#[async_trait]
impl PowerDeviceManager for DeviceGone {
    async fn dispatch(&self, device: &PowerDevice, _task: &str, _kwargs: serde_json::Value) -> Result<(), MonitorError> {
        Err(MonitorError::DeviceNotFound(device.sockaddr.clone()))
    }
    async fn check_availability(&self, _device: &PowerDevice) -> bool {
        true
    }
}

struct Faulty;

#[async_trait]
impl PowerDeviceManager for Faulty {
    async fn dispatch(&self, device: &PowerDevice, task: &str, _kwargs: serde_json::Value) -> Result<(), MonitorError> {
        Err(MonitorError::Dispatch { device: device.sockaddr.clone(), task: task.to_string(), reason: "boom".to_string() })
    }
    async fn check_availability(&self, _device: &PowerDevice) -> bool {
        true
    }
}

#[tokio::test]
async fn worker_clears_the_alert_while_the_device_is_available() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(AlwaysAvailable), alerts.clone(), Duration::from_secs(10));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!alerts.is_unavailable(&device().sockaddr));
    handle.stop_and_join().await;
}

#[tokio::test]
async fn worker_raises_the_alert_while_the_device_is_unavailable() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(AlwaysUnavailable), alerts.clone(), Duration::from_secs(10));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(alerts.is_unavailable(&device().sockaddr));
    handle.stop_and_join().await;
}

#[tokio::test]
async fn stop_and_join_releases_the_alert_on_exit() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(AlwaysUnavailable), alerts.clone(), Duration::from_secs(10));
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.stop_and_join().await;
    assert!(!alerts.is_unavailable(&device().sockaddr));
}

#[tokio::test]
async fn an_enqueued_stop_task_exits_the_worker_loop() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(AlwaysAvailable), alerts.clone(), Duration::from_secs(10));
    handle.enqueue(WorkerTask::stop());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_finished());
}

#[tokio::test]
async fn device_not_found_during_dispatch_stops_the_worker_without_faulting() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(DeviceGone), alerts.clone(), Duration::from_secs(10));
    handle.enqueue(WorkerTask::new("probe_outlet", serde_json::json!({})));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_finished());
}

#[tokio::test]
async fn an_uncaught_dispatch_error_faults_the_worker() {
    let alerts = Arc::new(AlertStore::new());
    let handle = spawn_worker(device(), Arc::new(Faulty), alerts.clone(), Duration::from_secs(10));
    handle.enqueue(WorkerTask::new("set_outlet_state", serde_json::json!({ "on": true })));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_finished());
}
