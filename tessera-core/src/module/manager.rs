//! Module registry, the one-shot screen assignment pass, and the per-tick
//! update fan-out.

use heapless::Vec;

use crate::config;
use crate::screen::{ScreenHandle, SCREEN_COUNT};

use super::{Context, Module};

/// Maximum registered modules
pub const MAX_MODULES: usize = 8;

/// Owns the module set
///
/// Screens are assigned exactly once, at `begin`; they are never reassigned
/// at runtime. Registration order is load-bearing: it fixes the default
/// assignment order and the `begin`/`update` iteration order.
pub struct ModuleManager<'m> {
    modules: Vec<&'m mut dyn Module, MAX_MODULES>,
    started: bool,
}

impl<'m> ModuleManager<'m> {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            started: false,
        }
    }

    /// Register a module
    pub fn register(&mut self, module: &'m mut dyn Module) {
        if self.modules.push(module).is_err() {
            warn!("module registry full, dropping registration");
        }
    }

    /// Assign screens and start every module, in registration order
    ///
    /// Runs the configured mapping when the store holds a valid one, the
    /// first-fit fallback otherwise. Every module gets its `begin` call even
    /// when its screen requirements went unsatisfied. Call exactly once.
    pub fn begin(&mut self, ctx: &mut Context<'_>) {
        if self.started {
            warn!("manager begin called twice, ignoring");
            return;
        }
        self.started = true;

        match config::load_module_map(&*ctx.store) {
            Some(map) => {
                info!("assigning screens from configured mapping");
                self.assign_mapped(&map);
            }
            None => {
                info!("no valid screen mapping, using first-fit assignment");
                self.assign_first_fit(ctx);
            }
        }

        for module in self.modules.iter_mut() {
            module.begin(ctx);
        }
    }

    /// Configured path: walk screens in index order, bind each named entry
    /// to the first not-yet-bound module instance with that name
    fn assign_mapped(&mut self, map: &config::ModuleMap) {
        let mut bound = [false; MAX_MODULES];

        for (screen_index, entry) in map.iter().enumerate() {
            if config::is_unassigned(entry) {
                continue;
            }

            let candidate = (0..self.modules.len())
                .find(|&i| !bound[i] && self.modules[i].name() == entry.as_str());

            match candidate {
                Some(i) => {
                    self.modules[i].assign_screen(0, ScreenHandle::new(screen_index));
                    bound[i] = true;
                    info!("screen {} -> {}", screen_index, entry.as_str());
                }
                // Recoverable: the screen stays blank, siblings are unaffected
                None => warn!(
                    "no unbound module named {} for screen {}",
                    entry.as_str(),
                    screen_index
                ),
            }
        }
    }

    /// Default path: registration order, first-fit over ascending screen
    /// indices, matching the required capability
    fn assign_first_fit(&mut self, ctx: &mut Context<'_>) {
        let mut taken = [false; SCREEN_COUNT];
        let slots = ctx.screens.len().min(SCREEN_COUNT);

        for module in self.modules.iter_mut() {
            for slot in 0..module.required_screens() {
                let kind = module.required_screen_kind(slot);
                let found = (0..slots).find(|&i| !taken[i] && ctx.screens.kind(i) == Some(kind));

                match found {
                    Some(i) => {
                        taken[i] = true;
                        module.assign_screen(slot, ScreenHandle::new(i));
                        info!("screen {} -> {}", i, module.name());
                    }
                    // The module keeps running; updates for this slot no-op
                    None => warn!("no free {:?} screen for {}", kind, module.name()),
                }
            }
        }
    }

    /// One tick: update every module in registration order
    ///
    /// Calls are strictly sequential; a slow fetch delays later modules for
    /// this tick. Failures never propagate: modules degrade internally.
    pub fn update(&mut self, ctx: &mut Context<'_>) {
        for module in self.modules.iter_mut() {
            let outcome = module.update(ctx);
            trace!("{} update: {:?}", module.name(), outcome);
        }
    }

    /// Broadcast the force signal to every module
    pub fn force_update(&mut self) {
        info!("force update broadcast");
        for module in self.modules.iter_mut() {
            module.force_update();
        }
    }
}

impl Default for ModuleManager<'_> {
    fn default() -> Self {
        Self::new()
    }
}
