mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{extensions, write_files};
use office_to_pdf::config::config::default_extensions;
use office_to_pdf::error::ConvertError;
use office_to_pdf::models::file::{FileCollectInput, FileCollectOutput};
use office_to_pdf::service::file::FileService;
use office_to_pdf::service::traits::i_service::FileServiceTrait;
use office_to_pdf::utils::logger::MemoryLogger;

fn scan(input: &std::path::Path, output: &std::path::Path) -> (FileCollectOutput, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let service = FileService::new(logger.clone());
    let result = service
        .collect_files(FileCollectInput {
            input_folder: input.to_path_buf(),
            output_folder: output.to_path_buf(),
            extensions: default_extensions(),
        })
        .unwrap();
    (result, logger)
}

fn pending_names(output: &FileCollectOutput) -> HashSet<String> {
    output.pending.iter().map(|t| t.file_name.clone()).collect()
}

#[test]
fn test_filters_by_extension_case_insensitive() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(
        input.path(),
        &["a.docx", "B.PPTX", "c.Xls", "notes.txt", "image.png", "README", "d.doc"],
    );

    let (result, _) = scan(input.path(), output.path());
    let expected: HashSet<String> = ["a.docx", "B.PPTX", "c.Xls", "d.doc"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(pending_names(&result), expected);
    assert_eq!(result.total_matching, 4);
}

#[test]
fn test_excludes_files_with_existing_pdf() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["a.docx", "b.xlsx"]);
    std::fs::write(output.path().join("a.pdf"), b"%PDF").unwrap();

    let (result, logger) = scan(input.path(), output.path());
    assert_eq!(pending_names(&result), HashSet::from(["b.xlsx".to_string()]));
    assert_eq!(result.total_matching, 2);
    assert_eq!(result.already_converted(), 1);
    assert!(logger.contains("1 個檔案需要轉換（1 個已轉換）"));
}

#[test]
fn test_task_paths_point_to_pdf_in_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["quarterly.report.xlsx"]);

    let (result, _) = scan(input.path(), output.path());
    let task = &result.pending[0];
    assert_eq!(task.input_path, input.path().join("quarterly.report.xlsx"));
    assert_eq!(task.output_path, output.path().join("quarterly.report.pdf"));
}

#[test]
fn test_ignores_directories_with_office_names() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::create_dir(input.path().join("folder.docx")).unwrap();
    write_files(input.path(), &["real.docx"]);

    let (result, _) = scan(input.path(), output.path());
    assert_eq!(pending_names(&result), HashSet::from(["real.docx".to_string()]));
}

#[test]
fn test_discovery_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["a.docx", "b.pptx", "c.xlsx"]);

    let (first, _) = scan(input.path(), output.path());
    let (second, _) = scan(input.path(), output.path());
    assert_eq!(pending_names(&first), pending_names(&second));
}

#[test]
fn test_missing_input_directory() {
    let output = tempfile::tempdir().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let service = FileService::new(logger.clone());
    let err = service
        .collect_files(FileCollectInput {
            input_folder: output.path().join("does-not-exist"),
            output_folder: output.path().to_path_buf(),
            extensions: default_extensions(),
        })
        .unwrap_err();
    assert!(matches!(err, ConvertError::DirectoryNotFound(_)));
}

#[test]
fn test_custom_extension_set() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["a.docx", "b.pptx", "c.odt"]);

    let logger = Arc::new(MemoryLogger::new());
    let result = FileService::new(logger)
        .collect_files(FileCollectInput {
            input_folder: input.path().to_path_buf(),
            output_folder: output.path().to_path_buf(),
            extensions: extensions(&["odt", "pptx"]),
        })
        .unwrap();
    let expected: HashSet<String> = ["b.pptx", "c.odt"].iter().map(|s| s.to_string()).collect();
    assert_eq!(pending_names(&result), expected);
}
