use memlog_studio::commands::{
    execute_free, execute_pmap, execute_process, CommandOutcome, FreeArgs, PmapArgs, ProcessArgs,
};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_process_command_exports_normalized_table() {
    let input = write_temp(
        "统计时间: 2024-05-01 10:00:00\n\
         PROCESS PSS(MB) RSS(MB) VSS(MB)\n\
         a 1.00 2.00 3.00\n\
         统计时间: 2024-05-01 10:01:00\n\
         PROCESS PSS(MB) RSS(MB) VSS(MB)\n\
         b 4.00 5.00 6.00\n",
    );
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("process.csv");

    let outcome = execute_process(ProcessArgs {
        input: input.path().to_path_buf(),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed { records: 4 });
    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn test_process_command_entity_filter() {
    let input = write_temp(
        "统计时间: 2024-05-01 10:00:00\n\
         PROCESS PSS(MB) RSS(MB) VSS(MB)\n\
         a 1.00 2.00 3.00\n\
         b 4.00 5.00 6.00\n",
    );

    let outcome = execute_process(ProcessArgs {
        input: input.path().to_path_buf(),
        entities: vec!["b".to_string()],
        ..Default::default()
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed { records: 1 });
}

#[test]
fn test_process_command_no_data() {
    let input = write_temp("nothing to see\n");

    let outcome = execute_process(ProcessArgs {
        input: input.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::NoData);
}

#[test]
fn test_missing_input_is_an_error() {
    let missing = PathBuf::from("/no/such/dir/memory.log");

    let err = execute_process(ProcessArgs {
        input: missing.clone(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("/no/such/dir/memory.log"));

    assert!(execute_pmap(PmapArgs {
        input: Some(missing),
        output: None,
    })
    .is_err());
}

#[test]
fn test_free_command() {
    let input = write_temp("Mem: 100 40 60 0 0 55\nSwap: 10 1 9\n");

    let outcome = execute_free(FreeArgs {
        input: input.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed { records: 2 });
}

#[test]
fn test_pmap_command_appends_xlsx_extension() {
    let input = write_temp(
        "Address Kbytes PSS Dirty Swap Mode Mapping\n\
         0000555555554000 100 50 10 0 r-x-- app\n",
    );
    let out_dir = tempfile::tempdir().unwrap();
    let requested = out_dir.path().join("result");

    let outcome = execute_pmap(PmapArgs {
        input: Some(input.path().to_path_buf()),
        output: Some(requested),
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed { records: 1 });
    assert!(out_dir.path().join("result.xlsx").exists());
}

#[test]
fn test_pmap_command_survives_export_failure() {
    let input = write_temp(
        "Address Kbytes PSS Dirty Swap Mode Mapping\n\
         0000555555554000 100 50 10 0 r-x-- app\n",
    );
    let out_dir = tempfile::tempdir().unwrap();
    // a directory named like the workbook makes the write fail
    let blocked = out_dir.path().join("blocked.xlsx");
    std::fs::create_dir(&blocked).unwrap();

    let outcome = execute_pmap(PmapArgs {
        input: Some(input.path().to_path_buf()),
        output: Some(blocked),
    })
    .unwrap();

    assert_eq!(outcome, CommandOutcome::Completed { records: 1 });
}
