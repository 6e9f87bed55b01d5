mod support;

use smoke_core::locator::config_path_strategies;
use smoke_core::{Category, ConstructionProbe, FaultOrigin, FnStrategy, HarnessDriver, HarnessEventKind, HarnessState,
                 ModelConstructor, ModelStrategy, Provisioner, ProvisioningStatus, Status, StrategyMiss};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use support::{model_strategy, Behavior, FakeFetcher, FakeModel, NUMPY_INT_MESSAGE};

const CFG: &str = "[net]\nwidth=416\nheight=416\n";

fn write_root_config(root: &Path) {
    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(root.join("config").join("yolov3.cfg"), CFG).unwrap();
}

fn counter() -> Rc<Cell<usize>> { Rc::new(Cell::new(0)) }

#[test]
fn root_layout_with_existing_config_passes() {
    let dir = tempfile::tempdir().unwrap();
    write_root_config(dir.path());
    let model = FakeModel::new(Behavior::Pass);
    let (root_tries, packaged_tries) = (counter(), counter());
    let fetcher = FakeFetcher::serving(CFG);
    let fetches = fetcher.calls.clone();

    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", Some(model.clone()), root_tries.clone()),
                                                             model_strategy("packaged-layout", None, packaged_tries.clone()),])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .provisioner(Provisioner::new(Box::new(fetcher), "u", dir.path().join("config/yolov3.cfg")))
                                      .probe(ConstructionProbe::new(416))
                                      .build()
                                      .run();

    let o = &run.outcome;
    assert_eq!(o.exit_code(), 0);
    assert_eq!(o.status, Status::Pass);
    assert_eq!(o.category, Category::None);
    assert_eq!(o.model_strategy.as_deref(), Some("root-layout"));
    assert_eq!(o.config_strategy.as_deref(), Some("root-config"));
    assert_eq!(o.provisioning, ProvisioningStatus::NotNeeded);
    assert_eq!(o.output.as_ref().map(|d| d.shapes.clone()), Some(vec![vec![1, 10647, 85]]));
    assert_eq!(root_tries.get(), 1);
    assert_eq!(packaged_tries.get(), 0);
    assert_eq!(fetches.get(), 0);
    assert_eq!(model.probes.get(), 1);
    assert_eq!(run.states,
               vec![HarnessState::Start,
                    HarnessState::LocatingModel,
                    HarnessState::LocatingConfig,
                    HarnessState::Probing,
                    HarnessState::Done]);
}

#[test]
fn packaged_layout_with_fetched_config_reproduces_known_incompatibility() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::new(Behavior::FailConstruct { class: "AttributeError",
                                                         message: NUMPY_INT_MESSAGE });
    let fetcher = FakeFetcher::serving(CFG);
    let fetches = fetcher.calls.clone();
    let target = dir.path().join("config").join("yolov3.cfg");

    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", None, counter()),
                                                             model_strategy("packaged-layout", Some(model), counter()),])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .provisioner(Provisioner::new(Box::new(fetcher), "https://example.invalid/yolov3.cfg", &target))
                                      .build()
                                      .run();

    let o = &run.outcome;
    assert_eq!(o.exit_code(), 1);
    assert_eq!(o.category, Category::EnvironmentIncompatibility);
    assert_eq!(o.failed_stage, Some(FaultOrigin::Construction));
    assert_eq!(o.fault_class.as_deref(), Some("AttributeError"));
    assert!(o.matched_signature.is_some());
    assert_eq!(o.model_strategy.as_deref(), Some("packaged-layout"));
    assert_eq!(o.provisioning, ProvisioningStatus::Fetched { bytes: CFG.len() });
    assert_eq!(o.config_path.as_deref(), Some(target.as_path()));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), CFG);
    assert_eq!(fetches.get(), 1);
    assert_eq!(run.states,
               vec![HarnessState::Start,
                    HarnessState::LocatingModel,
                    HarnessState::LocatingConfig,
                    HarnessState::ProvisioningConfig,
                    HarnessState::Probing,
                    HarnessState::Classifying,
                    HarnessState::Done]);

    let events = run.events();
    assert!(events.iter().any(|e| matches!(&e.kind, HarnessEventKind::AttemptFailed { strategy, .. } if strategy == "root-layout")));
    assert!(matches!(&events.last().unwrap().kind,
                     HarnessEventKind::RunFinished { status: Status::Fail,
                                                     category: Category::EnvironmentIncompatibility }));
    let diagnosed = events.iter().find_map(|e| match &e.kind {
                                     HarnessEventKind::Diagnosed { line, .. } => Some(line.clone()),
                                     _ => None,
                                 });
    assert!(diagnosed.unwrap().starts_with("DIAGNOSIS: SUCCESS!"));
}

#[test]
fn unresolvable_model_stops_before_probe_and_provisioning() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::serving(CFG);
    let fetches = fetcher.calls.clone();
    let (a, b) = (counter(), counter());

    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", None, a.clone()),
                                                             model_strategy("packaged-layout", None, b.clone()),])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .provisioner(Provisioner::new(Box::new(fetcher), "u", dir.path().join("config/yolov3.cfg")))
                                      .build()
                                      .run();

    let o = &run.outcome;
    assert_eq!(o.exit_code(), 1);
    assert_eq!(o.category, Category::ResolutionFailure);
    assert_eq!(o.failed_stage, Some(FaultOrigin::Locator));
    let msg = o.message.as_deref().unwrap();
    assert!(msg.contains("root-layout") && msg.contains("packaged-layout"), "{msg}");
    assert_eq!((a.get(), b.get()), (1, 1));
    assert_eq!(fetches.get(), 0);
    assert!(!dir.path().join("config").exists());
    assert_eq!(run.states, vec![HarnessState::Start, HarnessState::LocatingModel, HarnessState::Done]);
    assert!(!run.events().iter().any(|e| matches!(e.kind, HarnessEventKind::ProbePhase { .. })));
    let diagnosed: Vec<_> = run.events()
                               .into_iter()
                               .filter_map(|e| match e.kind {
                                   HarnessEventKind::Diagnosed { category, matched_signature, line } => {
                                       Some((category, matched_signature, line))
                                   }
                                   _ => None,
                               })
                               .collect();
    assert_eq!(diagnosed.len(), 1);
    assert_eq!(diagnosed[0].0, Category::ResolutionFailure);
    assert_eq!(diagnosed[0].1, None);
    assert!(diagnosed[0].2.starts_with("DIAGNOSIS: resolution-failure during locator"), "{}", diagnosed[0].2);
}

#[test]
fn import_time_alias_error_beats_resolution_failure() {
    let dir = tempfile::tempdir().unwrap();
    let broken = Box::new(FnStrategy::new("root-layout", || -> Result<Box<dyn ModelConstructor>, StrategyMiss> {
                              Err(StrategyMiss::new(format!("AttributeError: {NUMPY_INT_MESSAGE}")).with_class("AttributeError"))
                          })) as ModelStrategy;
    let (b, fetcher) = (counter(), FakeFetcher::serving(CFG));
    let fetches = fetcher.calls.clone();

    let run = HarnessDriver::builder().model_strategies(vec![broken, model_strategy("packaged-layout", None, b.clone())])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .provisioner(Provisioner::new(Box::new(fetcher), "u", dir.path().join("config/yolov3.cfg")))
                                      .build()
                                      .run();

    let o = &run.outcome;
    assert_eq!(o.category, Category::EnvironmentIncompatibility);
    assert_eq!(o.exit_code(), 1);
    assert_eq!(o.failed_stage, Some(FaultOrigin::Locator));
    assert_eq!(o.fault_class.as_deref(), Some("AttributeError"));
    assert_eq!(o.matched_signature.as_deref(), Some("module 'numpy' has no attribute 'int'"));
    assert_eq!(b.get(), 1);
    assert_eq!(fetches.get(), 0);
    assert_eq!(run.states, vec![HarnessState::Start, HarnessState::LocatingModel, HarnessState::Done]);
}

#[test]
fn missing_config_after_failed_provisioning_is_resolution_failure() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::new(Behavior::NeedsConfigFile);
    let target = dir.path().join("config").join("yolov3.cfg");

    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", Some(model.clone()), counter())])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .provisioner(Provisioner::new(Box::new(FakeFetcher::failing("dns failure")), "u", &target))
                                      .build()
                                      .run();

    let o = &run.outcome;
    assert_eq!(o.category, Category::ResolutionFailure);
    assert_eq!(o.failed_stage, Some(FaultOrigin::Construction));
    assert!(matches!(&o.provisioning, ProvisioningStatus::Failed { reason } if reason.contains("dns failure")));
    // El probe se intenta igualmente con la ruta canónica.
    assert_eq!(model.probes.get(), 1);
    assert_eq!(o.config_path.as_deref(), Some(target.as_path()));
}

#[test]
fn inference_fault_is_construction_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_root_config(dir.path());
    let model = FakeModel::new(Behavior::FailInfer { class: "RuntimeError",
                                                     message: "shape '[1, 3, 85, 13, 13]' is invalid" });

    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", Some(model), counter())])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .build()
                                      .run();

    assert_eq!(run.outcome.category, Category::ConstructionFailure);
    assert_eq!(run.outcome.failed_stage, Some(FaultOrigin::Inference));
    assert!(run.outcome.matched_signature.is_none());
}

#[test]
fn events_open_and_close_the_run_with_monotonic_seq() {
    let dir = tempfile::tempdir().unwrap();
    write_root_config(dir.path());
    let run = HarnessDriver::builder().model_strategies(vec![model_strategy("root-layout", Some(FakeModel::new(Behavior::Pass)), counter())])
                                      .config_strategies(config_path_strategies(dir.path(), "pytorchyolo", "yolov3"))
                                      .build()
                                      .run();

    let events = run.events();
    assert!(matches!(events[0].kind, HarnessEventKind::RunStarted { .. }));
    assert!(matches!(events.last().unwrap().kind, HarnessEventKind::RunFinished { status: Status::Pass, .. }));
    assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
    let phases = events.iter().filter(|e| matches!(e.kind, HarnessEventKind::ProbePhase { .. })).count();
    assert_eq!(phases, 3);
}
