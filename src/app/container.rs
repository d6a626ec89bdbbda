use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, LooperConfig, YtDlpAdapter};
use crate::app::loop_interactor::LoopInteractor;
use crate::ports::{CancelSignal, DownloadPort, ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn loop_interactor(&self) -> Arc<LoopInteractor>;
}

/// Wires the external tool adapters named in the configuration
pub struct DefaultAppContainer {
    loop_interactor: Arc<LoopInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: LooperConfig, cancel: CancelSignal) -> Self {
        let probe_port = Arc::new(
            FfprobeAdapter::new(config.ffprobe_bin.clone(), cancel.clone())
                .with_log_level(config.tool_log_level.clone()),
        );
        let execute_port = Arc::new(
            FfmpegAdapter::new(config.ffmpeg_bin.clone(), cancel.clone())
                .with_log_level(config.tool_log_level.clone())
                .with_stream_copy(config.extract_stream_copy),
        );
        let download_port = Arc::new(YtDlpAdapter::new(
            config.downloader_bin.clone(),
            cancel.clone(),
        ));

        let loop_interactor = Arc::new(LoopInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            execute_port as Arc<dyn ExecutePort>,
            download_port as Arc<dyn DownloadPort>,
            config,
            cancel,
        ));

        Self { loop_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn loop_interactor(&self) -> Arc<LoopInteractor> {
        Arc::clone(&self.loop_interactor)
    }
}
