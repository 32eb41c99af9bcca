//! Decide whether a piece of captured text is a shell command.

const KNOWN_PROGRAMS: &[&str] = &[
    // privilege
    "sudo", "su", "doas",
    // package managers
    "apt", "apt-get", "yum", "dnf", "pacman", "zypper", "brew", "choco", "winget", "scoop",
    // development
    "git", "npm", "yarn", "pnpm", "pip", "pipenv", "poetry", "cargo", "go", "rustc", "gcc",
    "clang", "make", "cmake", "docker", "docker-compose", "podman", "kubectl", "helm", "node",
    "python", "python3", "ruby", "php", "java", "javac",
    // files
    "ls", "cd", "pwd", "cp", "mv", "rm", "mkdir", "rmdir", "cat", "less", "more", "head", "tail",
    "touch", "ln", "chmod", "chown", "chgrp",
    // text
    "grep", "sed", "awk", "cut", "sort", "uniq", "wc", "tr", "find", "locate", "which", "whereis",
    // network
    "curl", "wget", "ping", "traceroute", "netstat", "ss", "ip", "ifconfig", "nslookup", "dig",
    "host", "ssh", "scp", "sftp", "rsync", "nc", "telnet",
    // system info
    "ps", "top", "htop", "free", "df", "du", "uname", "hostname", "uptime", "whoami", "id",
    "groups", "last", "w",
    // archives
    "tar", "gzip", "gunzip", "zip", "unzip", "7z", "rar", "unrar",
    // firewall and security
    "ufw", "iptables", "firewalld", "firewall-cmd", "setenforce", "getenforce", "apparmor",
    // services
    "systemctl", "service", "systemd", "journalctl", "rc-service", "rc-update",
    // wireless
    "iwlist", "iwconfig", "iw", "nmcli", "nmtui", "wpa_supplicant", "wpa_cli",
    // windows
    "cmd", "powershell", "pwsh", "wsl",
];

const TWO_WORD_STARTERS: &[&str] = &["npm run", "git commit", "docker run", "docker exec"];

const SCRIPT_EXTENSIONS: &[&str] = &[".sh", ".py", ".rb", ".pl", ".js", ".bat", ".cmd", ".ps1"];

/// Longest second word still treated as an option.
const MAX_OPTION_CHARS: usize = 20;

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Heuristic check that `text` is a single shell command.
///
/// Multi-line text is never a command. Otherwise the text qualifies when
/// its first word is a known program, it starts with a known two-word
/// command, its second word is a short option without CJK characters, or
/// its first word is a path or a script file.
pub fn looks_like_command(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.contains('\n') {
        return false;
    }

    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    let first = first.to_lowercase();

    if KNOWN_PROGRAMS.contains(&first.as_str()) {
        return true;
    }

    if TWO_WORD_STARTERS.iter().any(|s| text.starts_with(s)) {
        return true;
    }

    if let Some(second) = words.next() {
        if second.starts_with('-')
            && second.chars().count() <= MAX_OPTION_CHARS
            && !second.chars().any(is_cjk)
        {
            return true;
        }
    }

    if first.starts_with("./") || first.starts_with('/') || first.starts_with(".\\") {
        return true;
    }

    // Windows drive path such as `c:\tools\run.exe`.
    if first.chars().count() > 2 && first.chars().nth(1) == Some(':') {
        return true;
    }

    SCRIPT_EXTENSIONS.iter().any(|ext| first.ends_with(ext))
}
