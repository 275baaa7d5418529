//! Dockerfile text emission
//!
//! The layer sequence is fixed: base image, apt bootstrap, mise install,
//! unprivileged user, per-tool labels, marker file copies, mise config
//! (propagated or synthesized), ownership fix, entrypoint, and finally the
//! unprivileged `mise install` run. Label and copy order follows detection
//! order so unchanged projects rebuild from cache.

use crate::config::AgentboxConfig;
use crate::detect::{SourceFile, ToolSpec};
use crate::image::tag::sanitize;
use crate::image::ENTRYPOINT_CONTEXT_PATH;

const BASE_IMAGE: &str = "debian:12-slim";
const BOOTSTRAP_PACKAGES: &[&str] = &[
    "curl",
    "ca-certificates",
    "gnupg",
    "apt-transport-https",
    "libatomic1",
];
const MISE_CONFIG_PATH: &str = "/home/agent/.config/mise/config.toml";
const MISE_MANIFEST: &str = "mise.toml";
const SHIM_PATH: &str = "/home/agent/.local/share/mise/shims:/home/agent/.local/bin";

/// Renders the Dockerfile for a detected tool set.
pub fn render(specs: &[ToolSpec], files: &[SourceFile], config: &AgentboxConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("FROM {}", BASE_IMAGE));
    lines.push(String::new());
    lines.push(format!(
        "RUN apt-get update && apt-get install -y --no-install-recommends {}",
        BOOTSTRAP_PACKAGES.join(" ")
    ));
    lines.push(String::new());

    lines.push("RUN install -dm 755 /etc/apt/keyrings".to_string());
    lines.push(
        "RUN curl -fSs https://mise.jdx.dev/gpg-key.pub | tee /etc/apt/keyrings/mise-archive-keyring.pub >/dev/null"
            .to_string(),
    );
    lines.push(
        "RUN arch=$(dpkg --print-architecture) && echo \"deb [signed-by=/etc/apt/keyrings/mise-archive-keyring.pub arch=$arch] https://mise.jdx.dev/deb stable main\" | tee /etc/apt/sources.list.d/mise.list"
            .to_string(),
    );
    lines.push("RUN apt-get update && apt-get install -y mise".to_string());
    lines.push("RUN rm -rf /var/lib/apt/lists/*".to_string());
    lines.push(String::new());

    lines.push(
        "RUN groupadd -r agent && useradd -m -r -u 1000 -g agent -s /bin/bash agent".to_string(),
    );
    lines.push("ENV HOME=/home/agent".to_string());
    lines.push(format!("ENV PATH=\"{}:${{PATH}}\"", SHIM_PATH));
    lines.push(String::new());

    lines.push("RUN mkdir -p /home/agent/.config/mise".to_string());

    for spec in specs {
        lines.push(format!(
            "LABEL {}.{}=\"{}\"",
            config.label_namespace,
            sanitize(&spec.name),
            sanitize(&spec.version)
        ));
    }

    lines.push("WORKDIR /home/agent".to_string());

    let mut has_mise_manifest = false;
    for file in files {
        lines.push(format!("COPY {} {}", file.rel_path, file.rel_path));
        if file.rel_path == MISE_MANIFEST {
            has_mise_manifest = true;
        }
    }

    if has_mise_manifest {
        lines.push(format!("COPY {} {}", MISE_MANIFEST, MISE_CONFIG_PATH));
    } else {
        // No manifest in the project: synthesize one from the detected specs
        lines.push("RUN printf '%s\\n' \\".to_string());
        lines.push("  '[tools]' \\".to_string());
        for spec in specs {
            lines.push(format!("  '{} = \"{}\"' \\", spec.name, spec.version));
        }
        lines.push(format!("  > {}", MISE_CONFIG_PATH));
    }

    let mut chown_targets: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
    chown_targets.push(MISE_CONFIG_PATH);
    lines.push(format!("RUN chown agent:agent {}", chown_targets.join(" ")));

    lines.push(format!(
        "COPY {} /usr/local/bin/agent-entrypoint",
        ENTRYPOINT_CONTEXT_PATH
    ));
    lines.push("RUN chmod +x /usr/local/bin/agent-entrypoint".to_string());

    lines.push("USER agent".to_string());
    lines.push("RUN mise trust".to_string());
    lines.push("RUN mise install".to_string());
    lines.push(format!(
        "RUN printf 'export PATH=\"{}:$PATH\"\\n' > /home/agent/.bashrc",
        SHIM_PATH
    ));
    lines.push("RUN printf 'source ~/.bashrc\\n' > /home/agent/.bash_profile".to_string());
    lines.push(format!("WORKDIR {}", config.mount_point));
    lines.push("ENTRYPOINT [\"/bin/bash\", \"/usr/local/bin/agent-entrypoint\"]".to_string());

    lines.join("\n")
}
