use std::sync::Arc;

use tarp_column::{
    open_column,
    Column,
    ColumnError,
    ColumnId,
    CopyOptions,
    MemoryAdapter,
    StoredDataType,
    Table,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tarp_column=trace")
        .with_test_writer()
        .try_init();
}

fn stored_counts() -> (Arc<MemoryAdapter>, Column<i32>) {
    init_logging();

    let adapter = Arc::new(MemoryAdapter::new());
    let id = ColumnId::new("EVENTS", "COUNTS");
    adapter
        .put_values(id.clone(), 1, 4, &[10i32, 11, 12, 13, 14])
        .expect("Store column block");
    let column = Column::open(adapter.clone(), id).expect("Open column");
    (adapter, column)
}

#[test]
fn test_scenario_a_insert() {
    let (_adapter, mut column) = stored_counts();
    column.load().unwrap();

    column.insert(2, 3).unwrap();
    assert_eq!(column.length(), 8);
    assert_eq!(column.values().unwrap(), &[10, 11, 0, 0, 0, 12, 13, 14]);
}

#[test]
fn test_scenario_b_remove() {
    let (_adapter, mut column) = stored_counts();

    column.remove(1, 2).unwrap();
    assert_eq!(column.length(), 3);
    assert_eq!(column.values().unwrap(), &[10, 13, 14]);
}

#[test]
fn test_scenario_c_remove_everything() {
    let (_adapter, mut column) = stored_counts();
    column.load().unwrap();

    column.remove(0, 5).unwrap();
    assert_eq!(column.length(), 0);
    assert!(!column.is_loaded());
}

#[test]
fn test_scenario_d_presize_empty_column() {
    init_logging();

    let mut column = Column::<i32>::new("EMPTY", 0, 1);
    column.insert(0, 4).unwrap();
    assert_eq!(column.length(), 4);
    assert!(!column.is_loaded());
}

#[test]
fn test_scenario_e_conversions() {
    init_logging();

    let mut wide = Column::from_values("WIDE", 1, vec![1i64 << 53, -123_456_789_012]);
    assert_eq!(wide.as_real(0, 0).unwrap(), 9_007_199_254_740_992.0);
    assert_eq!(wide.as_real(1, 0).unwrap(), -123_456_789_012.0);

    let mut small = Column::from_values("SMALL", 1, vec![i16::MIN, 7]);
    assert_eq!(small.as_real(0, 0).unwrap(), -32768.0);

    let mut real = Column::from_values("REAL", 1, vec![3.99f64, -3.99, 0.0]);
    assert_eq!(real.as_integer(0, 0).unwrap(), 3);
    assert_eq!(real.as_integer(1, 0).unwrap(), -3);
    assert_eq!(real.as_integer(2, 0).unwrap(), 0);

    let mut single = Column::from_values("SINGLE", 1, vec![-1.5f32]);
    assert_eq!(single.as_integer(0, 0).unwrap(), -1);
}

#[rstest::rstest]
#[case(0, 1)]
#[case(2, 3)]
#[case(5, 2)]
fn test_insert_remove_inverse(#[case] row: usize, #[case] nrows: usize) {
    let (_adapter, mut column) = stored_counts();
    let original = column.values().unwrap().to_vec();

    column.insert(row, nrows).unwrap();
    column.remove(row, nrows).unwrap();
    assert_eq!(column.length(), 5);
    assert_eq!(column.values().unwrap(), original.as_slice());
}

#[test]
fn test_lazy_load_happens_once() {
    let (adapter, mut column) = stored_counts();
    assert!(!column.is_loaded());
    assert_eq!(adapter.reads(), 0);

    assert_eq!(column.as_text(0, 0).unwrap(), "10");
    assert_eq!(column.as_integer(4, 0).unwrap(), 14);
    assert_eq!(*column.get(2, 0).unwrap(), 12);
    assert!(column.is_loaded());
    assert_eq!(adapter.reads(), 1);
}

#[test]
fn test_offset_errors() {
    let adapter = Arc::new(MemoryAdapter::new());
    let id = ColumnId::new("EVENTS", "VEC");
    adapter
        .put_values(id.clone(), 3, 2, &[1u16, 2, 3, 4, 5, 6])
        .unwrap();
    let mut column = Column::<u16>::open(adapter, id).unwrap();

    assert_eq!(*column.get(1, 2).unwrap(), 6);
    assert!(matches!(column.get(2, 0), Err(ColumnError::InvalidRow { .. })));
    assert!(matches!(
        column.get(0, 3),
        Err(ColumnError::OutOfRange { index: 3, repeat: 3 })
    ));
}

#[test]
fn test_io_failure_keeps_column_unloaded() {
    let (adapter, mut column) = stored_counts();
    adapter.set_fail_reads(true);

    assert!(matches!(column.get(0, 0), Err(ColumnError::Io(_))));
    assert!(!column.is_loaded());
    assert_eq!(column.length(), 5);

    adapter.set_fail_reads(false);
    assert_eq!(*column.get(0, 0).unwrap(), 10);
}

#[test]
fn test_clone_independence() {
    let (_adapter, mut column) = stored_counts();
    column.load().unwrap();

    let mut copy = column.clone();
    copy.set(0, 0, -1).unwrap();
    copy.remove(1, 1).unwrap();
    column.set(4, 0, 99).unwrap();

    assert_eq!(column.values().unwrap(), &[10, 11, 12, 13, 99]);
    assert_eq!(copy.values().unwrap(), &[-1, 12, 13, 14]);
}

#[test]
fn test_conserve_memory_copy() {
    let (adapter, mut column) = stored_counts();
    let options = CopyOptions::builder().conserve_memory(true).build();

    let mut copy = column.duplicate(&options).unwrap();
    assert!(!column.is_loaded());
    assert!(copy.is_loaded());
    assert_eq!(copy.values().unwrap(), &[10, 11, 12, 13, 14]);
    assert_eq!(adapter.reads(), 1);
}

#[test]
fn test_save_and_reopen() {
    let (adapter, mut column) = stored_counts();
    column.insert(5, 1).unwrap();
    column.set(5, 0, 15).unwrap();

    let id = ColumnId::new("EVENTS", "COUNTS_V2");
    column.save(adapter.clone(), id.clone()).unwrap();

    let mut reopened = open_column(adapter, id).unwrap();
    assert_eq!(reopened.data_type(), StoredDataType::I32);
    assert_eq!(reopened.length(), 6);
    assert_eq!(reopened.as_integer(5, 0).unwrap(), 15);
}

#[test]
fn test_table_alignment() {
    let (adapter, column) = stored_counts();
    let names_id = ColumnId::new("EVENTS", "NAMES");
    let names: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
    adapter.put_values(names_id.clone(), 1, 4, &names).unwrap();

    let mut table = Table::new("EVENTS", 0);
    table.append_column(column).unwrap();
    table.append(open_column(adapter, names_id).unwrap()).unwrap();

    table.insert_rows(5, 2).unwrap();
    table.remove_rows(0, 3).unwrap();
    assert_eq!(table.nrows(), 4);

    let names = table.column_mut("NAMES").unwrap();
    assert_eq!(names.length(), 4);
    assert_eq!(names.as_text(0, 0).unwrap(), "d");
    assert_eq!(names.as_text(3, 0).unwrap(), "");

    let counts = table.typed_mut::<i32>("COUNTS").unwrap();
    assert_eq!(counts.values().unwrap(), &[13, 14, 0, 0]);
}
