//! The compile adapter: calls the external compiler and normalizes its result.

use crate::error::{Error, Result};

use super::types::{CompileRequest, CompileResult, CompilerOptions, CompilerOutput};

/// An external component compiler.
///
/// Implementations report compiler-raised failures as
/// [`Error::Compiler`]; any other error is a fault of the host side
/// (process, I/O, protocol).
pub trait ComponentCompiler {
    /// Compile `source` with `options`, without any normalization.
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput>;

    /// Whether this compiler can take another component.
    ///
    /// Pools discard compilers that report `false`.
    fn is_healthy(&mut self) -> bool {
        true
    }
}

impl<C: ComponentCompiler + ?Sized> ComponentCompiler for &mut C {
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput> {
        (**self).invoke(source, options)
    }

    fn is_healthy(&mut self) -> bool {
        (**self).is_healthy()
    }
}

impl<C: ComponentCompiler + ?Sized> ComponentCompiler for Box<C> {
    fn invoke(&mut self, source: &str, options: &CompilerOptions) -> Result<CompilerOutput> {
        (**self).invoke(source, options)
    }

    fn is_healthy(&mut self) -> bool {
        (**self).is_healthy()
    }
}

/// Compile a component and normalize the outcome.
///
/// - success: `code` is the generated code followed by a
///   `//# sourceMappingURL=` comment, each warning becomes a `warning` message
/// - parse or validation failure: `code` is `None` and `messages` holds one
///   `error` message built from the failure
/// - any other failure is returned as `Err`, unchanged
pub fn compile<C: ComponentCompiler + ?Sized>(
    compiler: &mut C,
    source: &str,
    options: &CompilerOptions,
) -> Result<CompileResult> {
    match compiler.invoke(source, options) {
        Ok(output) => Ok(CompileResult::from_output(output)),
        Err(Error::Compiler(failure)) if failure.kind.is_diagnostic() => {
            Ok(CompileResult::from_failure(failure))
        }
        Err(e) => Err(e),
    }
}

impl CompileRequest {
    /// Run this request through [`compile`].
    pub fn compile_with<C: ComponentCompiler + ?Sized>(
        &self,
        compiler: &mut C,
    ) -> Result<CompileResult> {
        compile(compiler, &self.source, &self.options)
    }
}
