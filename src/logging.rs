use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::io::stdout;
use std::path::Path;

use tracing::dispatcher::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::Layer as TraceLayer;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{self, Layer as LayerIntf, Registry};

use crate::config::{AppBasepathCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg};
use crate::constant::logging::{Destination as DstOption, Level as AppLogLevelInner};
use crate::AppLogAlias;

pub type AppLogLevel = AppLogLevelInner;
type HandlerEntry = (NonBlocking, tracing::Level, WorkerGuard);
type AppLogger = Dispatch;

/// Log routing built from the config file. Each handler is one non-blocking
/// writer, each logger is a `tracing` dispatcher binding a module-path alias
/// to a subset of the handlers.
pub struct AppLogContext {
    _io_guards: Vec<WorkerGuard>,
    loggers: HashMap<AppLogAlias, AppLogger, RandomState>,
}

// this macro has to be exposed since the top-level binary executable
// invokes it indirectly
#[macro_export]
macro_rules! to_3rdparty_level {
    ($lvlin:expr) => {
        match $lvlin {
            $crate::logging::AppLogLevel::FATAL | $crate::logging::AppLogLevel::ERROR => {
                tracing::Level::ERROR
            }
            $crate::logging::AppLogLevel::WARNING => tracing::Level::WARN,
            $crate::logging::AppLogLevel::INFO => tracing::Level::INFO,
            $crate::logging::AppLogLevel::DEBUG => tracing::Level::DEBUG,
            $crate::logging::AppLogLevel::TRACE => tracing::Level::TRACE,
        } // in `tracing` ecosystem, level comparison is like
          // TRACE > DEBUG > INFO > WARN > ERROR
    };
}

fn writer_to_localfs(basepath: &str, cfg: &AppLogHandlerCfg) -> (NonBlocking, WorkerGuard) {
    // config loading already rejected file handlers without a path
    let rpath = cfg.path.as_ref().unwrap_or_else(|| {
        panic!(
            "File:{}, Line:{}, configured path has to be present",
            file!(),
            line!()
        )
    });
    let mut fullpath = basepath.to_string();
    if !basepath.ends_with('/') && !rpath.starts_with('/') {
        fullpath += "/";
    }
    fullpath += rpath;
    let p = Path::new(&fullpath);
    let (dir, fname_prefix) = (p.parent().unwrap(), p.file_name().unwrap());
    let wr_dst = RollingFileAppender::new(Rotation::NEVER, dir, fname_prefix);
    tracing_appender::non_blocking(wr_dst)
}

fn writer_to_console(_cfg: &AppLogHandlerCfg) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(stdout())
} // Note tracing spawns a thread dedicated to each non-blocking writer

fn build_handler(basepath: &AppBasepathCfg, cfg: &AppLogHandlerCfg) -> HandlerEntry {
    let lvl = to_3rdparty_level!(&cfg.min_level);
    let (io_wr, guard) = match &cfg.destination {
        DstOption::CONSOLE => writer_to_console(cfg),
        DstOption::LOCALFS => writer_to_localfs(&basepath.system, cfg),
    }; // callers MUST keep the guard along with the writer, for successfully
       // flushing log messages to I/O
    (io_wr, lvl, guard)
}

fn build_logger(cfg: &AppLoggerCfg, hdlrs: &HashMap<AppLogAlias, HandlerEntry>) -> AppLogger {
    let iter = cfg.handlers.iter().filter_map(|alias| {
        hdlrs.get(alias).map(|(wr_ptr, default_lvl, _guard)| {
            let lvl = if let Some(l) = cfg.level.as_ref() {
                to_3rdparty_level!(l)
            } else {
                *default_lvl
            };
            TraceLayer::new()
                .with_writer(wr_ptr.clone())
                .with_file(false) // to prevent full path exposed
                .with_line_number(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(LevelFilter::from_level(lvl))
        })
    });
    let layers = Vec::from_iter(iter);
    Dispatch::new(Registry::default().with(layers))
}

impl AppLogContext {
    pub fn new(basepath: &AppBasepathCfg, cfg: &AppLoggingCfg) -> Self {
        let hdlrs: HashMap<AppLogAlias, HandlerEntry> = cfg
            .handlers
            .iter()
            .map(|item| (item.alias.clone(), build_handler(basepath, item)))
            .collect();
        let loggers: HashMap<AppLogAlias, Dispatch, RandomState> = cfg
            .loggers
            .iter()
            .map(|item| (item.alias.clone(), build_logger(item, &hdlrs)))
            .collect();
        Self {
            loggers,
            // keep guards of the IO writers alive for the app lifetime
            _io_guards: hdlrs.into_values().map(|(_, _, g)| g).collect(),
        }
    }

    pub fn get_assigner(&self, key: &str) -> Option<&Dispatch> {
        self.loggers.get(&key.to_string())
    }
} // end of impl AppLogContext

#[macro_export]
macro_rules! app_log_event {
    ( $ctx:ident, $lvl:expr, $($arg:tt)+ ) => {{
        const MOD_PATH:&str = module_path!();
        if let Some(assigner) = $ctx.get_assigner(MOD_PATH) {
            const LVL_INNER: tracing::Level = $crate::logging::to_3rdparty_level!($lvl);
            tracing::dispatcher::with_default(assigner, || {
                tracing::event!(LVL_INNER, $($arg)+);
            });
        } else {
            println!("[WARN] log dispatcher not found at the module path: {}", MOD_PATH);
            println!($($arg)+);
        }
    }};
}

pub use app_log_event;
pub use to_3rdparty_level;
