#![allow(missing_docs)]
#![cfg(all(feature = "macros", feature = "global"))]

use ioc::{Bean, BoxError, ErrorKind, Inject, Phase, Scope, global};

trait LogService: Send + Sync {
    fn prefix(&self) -> &'static str;
}

#[derive(Default, Bean)]
#[bean(provides(dyn LogService))]
struct ConsoleLogService;

impl LogService for ConsoleLogService {
    fn prefix(&self) -> &'static str {
        "[catalog]"
    }
}

#[derive(Default, Bean)]
struct ProductController {
    #[inject("logService")]
    log: Inject<dyn LogService>,
}

#[derive(Default, Bean)]
struct QuotaService;

#[derive(Bean)]
struct Settings {
    max_quota: usize,
}

#[test]
fn it_drives_default_container() {
    assert!(global::container().is_empty());
    assert_eq!(global::get_safe("logService").unwrap_err().kind(), ErrorKind::ContainerNotReady);

    global::register("logService", ConsoleLogService, Scope::Singleton).unwrap();
    global::register_by_category("service", QuotaService).unwrap();
    global::register_by_category_and_name("controller", "product", ProductController::default()).unwrap();
    global::register_factory("requestLog", Scope::Prototype, || Ok::<_, BoxError>(ConsoleLogService)).unwrap();
    global::register_singleton("settings", Settings { max_quota: 5 }).unwrap();

    global::init().unwrap();

    assert_eq!(global::container().phase(), Phase::Initialized);
    assert_eq!(
        global::get_all_names(),
        ["logService", "service:QuotaService", "controller:product", "requestLog", "settings"]
    );
    assert_eq!(global::get_all().len(), 5);
    assert_eq!(global::get("settings").downcast::<Settings>().unwrap().max_quota, 5);

    let controller = global::get_by_category("controller", "product");
    let controller = controller.downcast::<ProductController>().unwrap();
    assert_eq!(controller.log.prefix(), "[catalog]");
    assert!(global::get_by_category_safe("service", "QuotaService").is_ok());

    let first = global::get("requestLog");
    let second = global::get_safe("requestLog").unwrap();
    assert!(!first.ptr_eq(&second));

    let manual = ProductController::default();
    global::inject(&manual).unwrap();
    assert!(manual.log.is_injected());

    assert_eq!(
        global::register("late", QuotaService, Scope::Singleton).unwrap_err().kind(),
        ErrorKind::AlreadyInitialized
    );
    assert_eq!(global::init().unwrap_err().kind(), ErrorKind::AlreadyInitialized);
}
