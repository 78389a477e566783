use std::process::ExitCode;

use office_to_pdf::action::cli::process_args;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(output_dir) => {
            log::info!("程式執行完成，輸出目錄：{}", output_dir);
            println!("批次轉換完成！輸出檔案位於：{}", output_dir);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("執行失敗：{}", e);
            eprintln!("執行失敗：{}", e);
            ExitCode::FAILURE
        }
    }
}
