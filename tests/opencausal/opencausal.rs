#[path = "common/mod.rs"]
mod common;

#[path = "indexed/index_set.rs"]
mod index_set;
#[path = "indexed/indices_of.rs"]
mod indices_of;
#[path = "indexed/gather.rs"]
mod gather;
#[path = "indexed/scatter.rs"]
mod scatter;
#[path = "indexed/plates.rs"]
mod plates;
#[path = "indexed/mask.rs"]
mod mask;

#[path = "handlers/lazy_plate.rs"]
mod lazy_plate;
#[path = "handlers/device.rs"]
mod device;

#[path = "dynamical/event_loop.rs"]
mod event_loop;
#[path = "dynamical/solver.rs"]
mod solver;

#[path = "logging.rs"]
mod logging;
