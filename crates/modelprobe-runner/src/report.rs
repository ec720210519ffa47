use std::fmt::Display;
use std::io::{self, Write};

use modelprobe_core::{ModelSpec, SignatureSpec, Tensor, TensorId, TensorSpec};

/// Writes the human-readable report. Results go to `out`, failures to `err`.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Lists every signature name, then the inputs and outputs of `selected`
    /// as `key: <logical> <op:index>`.
    pub fn signatures(&mut self, model: &ModelSpec, selected: &SignatureSpec) -> io::Result<()> {
        for name in model.signature_names() {
            writeln!(self.out, "key: {name}")?;
        }
        for spec in selected.inputs.iter().chain(&selected.outputs) {
            self.entry(spec)?;
        }
        Ok(())
    }

    fn entry(&mut self, spec: &TensorSpec) -> io::Result<()> {
        writeln!(self.out, "key: {} {}", spec.name, spec.id)
    }

    pub fn passed(&mut self) -> io::Result<()> {
        writeln!(self.out, "Passed: OK")
    }

    pub fn failed(&mut self, reason: &dyn Display) -> io::Result<()> {
        writeln!(self.err, "Failed: {reason}")
    }

    /// Input lines; an input with no feed id left to pair with prints `-`.
    pub fn inputs(&mut self, ids: &[TensorId], inputs: &[Tensor]) -> io::Result<()> {
        for (i, tensor) in inputs.iter().enumerate() {
            match ids.get(i) {
                Some(id) => writeln!(self.out, "input {i} {id} {tensor}")?,
                None => writeln!(self.out, "input {i} - {tensor}")?,
            }
        }
        Ok(())
    }

    pub fn outputs(&mut self, outputs: &[(TensorId, Tensor)]) -> io::Result<()> {
        for (i, (id, tensor)) in outputs.iter().enumerate() {
            writeln!(self.out, "output {i} {id} {tensor}")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}
