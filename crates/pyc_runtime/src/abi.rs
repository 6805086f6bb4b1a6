//! Entry points used by generated `main` functions.

use crate::Runtime;
use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::core::ContextId;
use pyc_core::{Fatal, RunResult};

impl Runtime {
    /// Populate the module context: every builtin function and class,
    /// `__name__` and `__args__`. `ctx` becomes the global context.
    pub fn init_context(&mut self, ctx: ContextId, argv: &[String]) -> RunResult<()> {
        self.globals = Some(ctx);
        let mut registry = BuiltinRegistry::new();
        StdBuiltinProvider.install(&mut registry);
        registry.install_into(self, ctx)?;

        let module_name = self.config.module_name.clone();
        let name = self.new_str(module_name)?;
        self.store_name(ctx, "__name__", name);
        let mut args = Vec::with_capacity(argv.len());
        for arg in argv {
            args.push(self.new_str(arg.as_str())?);
        }
        let args = self.new_list(args)?;
        self.store_name(ctx, "__args__", args);
        tracing::debug!(argc = argv.len(), "initialized module context");
        Ok(())
    }

    /// Print the diagnostic for `err` and terminate the process.
    pub fn die(&mut self, err: &Fatal) -> ! {
        tracing::debug!(kind = ?err.kind, "fatal");
        let _ = self.flush_output();
        println!("{}", err.message());
        std::process::exit(1)
    }
}

/// Turn a fatal diagnostic into process termination at the call site.
pub trait OrDie<T> {
    fn or_die(self, rt: &mut Runtime) -> T;
}

impl<T> OrDie<T> for RunResult<T> {
    fn or_die(self, rt: &mut Runtime) -> T {
        match self {
            Ok(v) => v,
            Err(err) => rt.die(&err),
        }
    }
}
