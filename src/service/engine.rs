use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use crate::error::EngineError;
use crate::service::traits::i_engine::{ConversionEngine, DocumentSource, EngineDocument};

const BINARY_CANDIDATES: &[&str] = &["soffice", "libreoffice"];
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 以無頭模式的 LibreOffice 作為轉換引擎。
///
/// 每份文件都在獨立的暫存目錄中轉換，並使用各自的使用者設定檔，
/// 因此同一批次內可同時執行多個 soffice 程序。
pub struct LibreOfficeEngine {
    binary: PathBuf,
}

impl LibreOfficeEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        LibreOfficeEngine { binary: binary.into() }
    }

    /// 從 PATH 尋找 soffice 或 libreoffice
    pub fn locate() -> Result<Self, EngineError> {
        BINARY_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(LibreOfficeEngine::new)
            .ok_or_else(|| EngineError::new("找不到 LibreOffice（soffice），請安裝或以 --soffice 指定路徑"))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ConversionEngine for LibreOfficeEngine {
    fn name(&self) -> &str {
        "libreoffice"
    }

    fn load(&self, source: DocumentSource) -> Result<Box<dyn EngineDocument>, EngineError> {
        if source.bytes.is_empty() {
            return Err(EngineError::new(format!("文件內容為空：{}", source.file_name)));
        }
        let workdir = tempfile::Builder::new().prefix("office_to_pdf-").tempdir()?;
        let file_name = Path::new(&source.file_name)
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| EngineError::new(format!("無效的檔名：{}", source.file_name)))?;
        let input = workdir.path().join(file_name);
        fs::write(&input, &source.bytes)?;

        Ok(Box::new(LibreOfficeDocument {
            binary: self.binary.clone(),
            input,
            workdir: Some(workdir),
        }))
    }
}

struct LibreOfficeDocument {
    binary: PathBuf,
    input: PathBuf,
    workdir: Option<TempDir>,
}

impl EngineDocument for LibreOfficeDocument {
    fn export_pdf(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, EngineError> {
        let workdir = self
            .workdir
            .as_ref()
            .ok_or_else(|| EngineError::new("文件已關閉"))?
            .path();
        let out_dir = workdir.join("out");
        let profile = workdir.join("profile");
        let stderr_path = workdir.join("stderr.log");
        fs::create_dir_all(&out_dir)?;

        let mut child = Command::new(&self.binary)
            .arg(format!("-env:UserInstallation=file://{}", profile.display()))
            .arg("--headless")
            .arg("--norestore")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(&self.input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(File::create(&stderr_path)?)
            .spawn()
            .map_err(|e| EngineError::new(format!("無法啟動 {}：{}", self.binary.display(), e)))?;

        // 放棄的轉換要結束 soffice 程序，不留在背景執行
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if cancel.is_cancelled() {
                if let Err(e) = child.kill() {
                    log::warn!("無法結束 soffice 程序 {}：{}", child.id(), e);
                }
                let _ = child.wait();
                return Err(EngineError::new("轉換已中止，soffice 程序已結束"));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
        if !status.success() {
            return Err(EngineError::new(format!("LibreOffice 結束代碼 {}：{}", status, stderr.trim())));
        }

        let stem = self
            .input
            .file_stem()
            .ok_or_else(|| EngineError::new("無效的輸入檔名"))?;
        let pdf_path = out_dir.join(format!("{}.pdf", stem.to_string_lossy()));
        fs::read(&pdf_path)
            .map_err(|_| EngineError::new(format!("LibreOffice 未產生 PDF：{}", stderr.trim())))
    }

    fn close(&mut self) -> Result<(), EngineError> {
        match self.workdir.take() {
            Some(workdir) => workdir.close().map_err(EngineError::from),
            None => Ok(()),
        }
    }
}
