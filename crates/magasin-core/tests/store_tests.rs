use magasin_core::{
    IdPrefix, JsonFileStore, MagasinConfig, MagasinError, MaterialDraft, MemoryStore,
    PlacementWorkflow, RackDraft, ReceptionBatch, StorageError, Warehouse,
};
use magasin_test_utils::StepClock;
use pretty_assertions::assert_eq;

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse_data.json");

    {
        let mut warehouse = Warehouse::open(JsonFileStore::new(&path), MagasinConfig::default())
            .unwrap()
            .with_clock(StepClock::seconds());
        warehouse
            .register_material(&MaterialDraft::new("PN-100", "SN-200"))
            .unwrap();
        warehouse.register_rack(&RackDraft::new("A", "01", "01")).unwrap();

        let mut workflow = PlacementWorkflow::new();
        workflow.scan_material(&warehouse, "SN-200").unwrap();
        workflow.scan_rack(&warehouse, "a-01-01").unwrap();
        workflow.confirm(&mut warehouse, "OP42").unwrap();
        warehouse.undo_last_placement(|_| true).unwrap();
    }

    let reopened = Warehouse::open(JsonFileStore::new(&path), MagasinConfig::default()).unwrap();
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.materials.len(), 1);
    assert_eq!(snapshot.racks.len(), 1);
    assert!(snapshot.placements.is_empty());
    assert_eq!(snapshot.audit_log.len(), 4);
    assert_eq!(snapshot.sequences.current(IdPrefix::Placement), 1);
}

#[test]
fn quota_exhaustion_is_a_storage_failure() {
    let mut warehouse =
        Warehouse::open(MemoryStore::new().with_quota(64), MagasinConfig::default()).unwrap();
    let err = warehouse
        .register_material(&MaterialDraft::new("PN-100", "SN-200"))
        .unwrap_err();
    assert!(matches!(
        err,
        MagasinError::Storage(StorageError::QuotaExceeded { quota: 64, .. })
    ));
    assert!(warehouse.snapshot().materials.is_empty());
    assert!(warehouse.snapshot().audit_log.is_empty());
    assert_eq!(warehouse.snapshot().sequences.current(IdPrefix::Material), 0);
}

#[test]
fn legacy_document_ids_continue_after_max_suffix() {
    let legacy = r#"{
        "materials": [
            {"id":"MAT007","partNumber":"PN-100","serialNumber":"SN-200","type":"Electronic",
             "dateReceived":"2024-01-01","barcode":"MAT007-PN-100-SN-200",
             "timestamp":"2024-01-01T10:00:00Z"}
        ],
        "racks": [],
        "placements": [],
        "auditLog": []
    }"#;
    let mut warehouse = Warehouse::open(
        MemoryStore::new().with_document(legacy),
        MagasinConfig::default(),
    )
    .unwrap();
    let material = warehouse
        .register_material(&MaterialDraft::new("PN-101", "SN-201"))
        .unwrap();
    assert_eq!(material.id().as_str(), "MAT008");
    assert_eq!(
        warehouse.find_material("mat007-pn-100-sn-200").unwrap().id().as_str(),
        "MAT007"
    );
}

#[test]
fn bulk_csv_skips_bad_rows() {
    let store = MemoryStore::new();
    let mut warehouse = Warehouse::open(store, MagasinConfig::default()).unwrap();
    let batch = ReceptionBatch::parse(
        "partNumber,serialNumber,type\nPN-100,SN-200,Mechanical\nPN-100,SN-200,\nX,SN-1,\n",
    );
    let report = warehouse.bulk_receive(&batch).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.invalid, 1);
    assert_eq!(
        warehouse.find_material("PN-100").unwrap().material_type(),
        "Mechanical"
    );
}
