use libpass_core::PassError;

use super::PassManager;

impl PassManager {
    /// Render the usage index of the most recent collection.
    ///
    /// One block per managed pass: its name, one `    <-- ` line per required
    /// pass, one `    --> ` line per provider of it, then a blank line.
    pub fn render_dump(&self) -> Result<String, PassError> {
        let mut out = String::new();

        for (&id, usage) in &self.usages {
            out.push_str(&self.pass_name(id)?);
            out.push('\n');

            for &required in usage.requires() {
                out.push_str(&format!("    <-- {}\n", self.pass_name(required)?));
            }

            if let Some(providers) = self.provides.get(&id) {
                for &provider in providers {
                    out.push_str(&format!("    --> {}\n", self.pass_name(provider)?));
                }
            }

            out.push('\n');
        }

        Ok(out)
    }

    /// Write the dependency graph report to the manager's stream.
    pub fn dump(&self) -> Result<(), PassError> {
        let report = self.render_dump()?;
        self.stream.write_str(&report)?;
        self.stream.flush()
    }
}
