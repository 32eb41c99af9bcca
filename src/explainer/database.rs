//! Built-in reference entries for common commands.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::i18n::Language;

/// A string available in both supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    pub zh: &'static str,
    pub en: &'static str,
}

impl Text {
    pub const fn new(zh: &'static str, en: &'static str) -> Self {
        Self { zh, en }
    }

    pub fn get(&self, language: Language) -> &'static str {
        language.pick(self.zh, self.en)
    }
}

const fn t(zh: &'static str, en: &'static str) -> Text {
    Text::new(zh, en)
}

#[derive(Debug, Clone, Copy)]
pub struct OptionDoc {
    pub short: char,
    pub long: &'static str,
    pub desc: Text,
}

const fn opt(short: char, long: &'static str, desc: Text) -> OptionDoc {
    OptionDoc { short, long, desc }
}

#[derive(Debug)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: Text,
    pub purpose: Text,
    pub options: &'static [OptionDoc],
    pub examples: &'static [Text],
    pub warnings: &'static [Text],
    pub alternatives: &'static [Text],
}

impl CommandInfo {
    /// Find an option by its short letter or long name, dashes stripped.
    pub fn option(&self, key: &str) -> Option<&OptionDoc> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.options.iter().find(|o| o.short == c),
            _ => self.options.iter().find(|o| o.long == key),
        }
    }
}

const ENTRIES: &[CommandInfo] = &[
    CommandInfo {
        name: "rm",
        description: t("删除文件或目录", "Remove files or directories"),
        purpose: t(
            "永久删除指定的文件或目录",
            "Permanently delete specified files or directories",
        ),
        options: &[
            opt('r', "recursive", t("递归删除目录及其内容", "Remove directories and their contents recursively")),
            opt('f', "force", t("强制删除，不提示确认", "Force removal without confirmation")),
            opt('i', "interactive", t("删除前逐一询问确认", "Prompt before each removal")),
            opt('v', "verbose", t("显示删除过程", "Explain what is being done")),
        ],
        examples: &[
            t("rm file.txt  # 删除文件", "rm file.txt  # Remove a file"),
            t("rm -rf directory  # 递归强制删除目录", "rm -rf directory  # Remove directory recursively and force"),
            t("rm -i file.txt  # 删除前确认", "rm -i file.txt  # Confirm before removal"),
        ],
        warnings: &[
            t("删除操作不可逆！", "Deletion is irreversible!"),
            t("使用 -r 选项时请特别小心", "Be careful with -r option"),
            t("建议先用 -i 选项确认", "Consider using -i option to confirm"),
        ],
        alternatives: &[
            t("使用 trash 命令移动到回收站", "Use trash command to move to recycle bin"),
            t("先用 ls 确认要删除的文件", "Verify files with ls first"),
        ],
    },
    CommandInfo {
        name: "cp",
        description: t("复制文件或目录", "Copy files or directories"),
        purpose: t(
            "将文件或目录复制到指定位置",
            "Copy files or directories to a specified location",
        ),
        options: &[
            opt('r', "recursive", t("递归复制目录", "Copy directories recursively")),
            opt('v', "verbose", t("显示复制过程", "Verbose output")),
            opt('i', "interactive", t("覆盖前询问确认", "Prompt before overwrite")),
        ],
        examples: &[
            t("cp src.txt dest.txt  # 复制文件", "cp src.txt dest.txt  # Copy a file"),
            t("cp -r src_dir dest_dir  # 递归复制目录", "cp -r src_dir dest_dir  # Copy directory recursively"),
        ],
        warnings: &[t("目标文件存在时会被覆盖", "Existing destination files will be overwritten")],
        alternatives: &[],
    },
    CommandInfo {
        name: "mv",
        description: t("移动或重命名文件", "Move or rename files"),
        purpose: t("将文件移动到新位置或重命名", "Move files to new location or rename them"),
        options: &[
            opt('v', "verbose", t("显示移动过程", "Verbose output")),
            opt('i', "interactive", t("覆盖前询问确认", "Prompt before overwrite")),
        ],
        examples: &[
            t("mv old.txt new.txt  # 重命名", "mv old.txt new.txt  # Rename file"),
            t("mv file.txt /path/to/dest/  # 移动文件", "mv file.txt /path/to/dest/  # Move file"),
        ],
        warnings: &[t("目标文件存在时会被覆盖", "Existing destination files will be overwritten")],
        alternatives: &[],
    },
    CommandInfo {
        name: "ls",
        description: t("列出目录内容", "List directory contents"),
        purpose: t("显示当前目录下的文件和文件夹", "Display files and folders in current directory"),
        options: &[
            opt('l', "long", t("显示详细信息", "Long format with details")),
            opt('a', "all", t("显示隐藏文件", "Show hidden files")),
            opt('h', "human-readable", t("以人类可读格式显示大小", "Human readable file sizes")),
        ],
        examples: &[
            t("ls  # 列出当前目录", "ls  # List current directory"),
            t("ls -la  # 显示所有文件的详细信息", "ls -la  # List all files with details"),
            t("ls -lh  # 显示文件大小", "ls -lh  # List with human readable sizes"),
        ],
        warnings: &[],
        alternatives: &[],
    },
    CommandInfo {
        name: "cat",
        description: t("显示文件内容", "Display file contents"),
        purpose: t("在终端中输出文件内容", "Output file contents to terminal"),
        options: &[opt('n', "number", t("显示行号", "Number output lines"))],
        examples: &[
            t("cat file.txt  # 显示文件内容", "cat file.txt  # Display file contents"),
            t("cat -n file.txt  # 显示带行号的内容", "cat -n file.txt  # Display with line numbers"),
        ],
        warnings: &[],
        alternatives: &[
            t("使用 less 命令分页查看大文件", "Use less command to page through large files"),
            t("使用 head/tail 查看文件开头/结尾", "Use head/tail to view beginning/end"),
        ],
    },
    CommandInfo {
        name: "chmod",
        description: t("修改文件权限", "Change file permissions"),
        purpose: t(
            "更改文件或目录的访问权限",
            "Change access permissions for files or directories",
        ),
        options: &[opt('R', "recursive", t("递归修改目录权限", "Change permissions recursively"))],
        examples: &[
            t("chmod 755 script.sh  # 设置执行权限", "chmod 755 script.sh  # Set execute permission"),
            t("chmod +x script.sh  # 添加执行权限", "chmod +x script.sh  # Add execute permission"),
            t("chmod -R 644 dir/  # 递归设置目录权限", "chmod -R 644 dir/  # Set directory permissions recursively"),
        ],
        warnings: &[
            t("修改系统文件权限可能导致系统异常", "Modifying system file permissions may cause issues"),
            t("使用 -R 时请特别小心", "Be careful with -R option"),
        ],
        alternatives: &[],
    },
    CommandInfo {
        name: "chown",
        description: t("修改文件所有者", "Change file owner"),
        purpose: t(
            "更改文件或目录的所有者和组",
            "Change owner and group of files or directories",
        ),
        options: &[opt('R', "recursive", t("递归修改所有者", "Change owner recursively"))],
        examples: &[
            t("chown user file.txt  # 修改所有者", "chown user file.txt  # Change owner"),
            t("chown -R user:group dir/  # 递归修改", "chown -R user:group dir/  # Change recursively"),
        ],
        warnings: &[
            t("需要管理员权限", "Requires admin privileges"),
            t("修改系统文件可能引发问题", "Modifying system files may cause problems"),
        ],
        alternatives: &[],
    },
    CommandInfo {
        name: "apt",
        description: t("Debian/Ubuntu 包管理器", "Debian/Ubuntu package manager"),
        purpose: t(
            "管理软件包的安装、更新和删除",
            "Manage package installation, updates, and removal",
        ),
        options: &[opt('y', "yes", t("自动确认", "Auto-confirm"))],
        examples: &[
            t("apt update  # 更新软件源", "apt update  # Update package list"),
            t("apt install package  # 安装软件", "apt install package  # Install software"),
            t("apt remove package  # 卸载软件", "apt remove package  # Remove software"),
        ],
        warnings: &[t(
            "卸载软件可能影响依赖它的其他软件",
            "Removing packages may affect dependent software",
        )],
        alternatives: &[],
    },
    CommandInfo {
        name: "yum",
        description: t("RHEL/CentOS 包管理器", "RHEL/CentOS package manager"),
        purpose: t(
            "管理软件包的安装、更新和删除",
            "Manage package installation, updates, and removal",
        ),
        options: &[opt('y', "assumeyes", t("自动确认", "Auto-confirm"))],
        examples: &[
            t("yum update  # 更新所有软件", "yum update  # Update all packages"),
            t("yum install package  # 安装软件", "yum install package  # Install software"),
            t("yum remove package  # 卸载软件", "yum remove package  # Remove software"),
        ],
        warnings: &[t("需要管理员权限", "Requires admin privileges")],
        alternatives: &[],
    },
    CommandInfo {
        name: "curl",
        description: t("网络数据传输工具", "Network data transfer tool"),
        purpose: t("从服务器下载或上传数据", "Download or upload data from/to servers"),
        options: &[
            opt('O', "remote-name", t("以远程文件名保存", "Save using the remote file name")),
            opt('X', "request", t("指定请求方法", "Specify the request method")),
            opt('L', "location", t("跟随重定向", "Follow redirects")),
        ],
        examples: &[
            t("curl https://example.com  # 获取网页内容", "curl https://example.com  # Get web page content"),
            t("curl -O https://example.com/file  # 下载文件", "curl -O https://example.com/file  # Download file"),
            t("curl -X POST https://api.com/data  # POST 请求", "curl -X POST https://api.com/data  # POST request"),
        ],
        warnings: &[t("从网络下载文件可能包含恶意内容", "Downloaded files may contain malicious content")],
        alternatives: &[],
    },
    CommandInfo {
        name: "wget",
        description: t("网络文件下载工具", "Network file downloader"),
        purpose: t("从网络下载文件", "Download files from the web"),
        options: &[
            opt('c', "continue", t("断点续传", "Continue a partial download")),
            opt('r', "recursive", t("递归下载", "Download recursively")),
        ],
        examples: &[
            t("wget https://example.com/file.zip  # 下载文件", "wget https://example.com/file.zip  # Download file"),
            t("wget -c url  # 断点续传", "wget -c url  # Continue interrupted download"),
            t("wget -r url  # 递归下载", "wget -r url  # Recursive download"),
        ],
        warnings: &[
            t("递归下载可能消耗大量带宽", "Recursive download may consume lots of bandwidth"),
            t("下载文件前请验证来源", "Verify source before downloading"),
        ],
        alternatives: &[t("使用 curl 作为替代", "Use curl as alternative")],
    },
    CommandInfo {
        name: "git",
        description: t("分布式版本控制系统", "Distributed version control system"),
        purpose: t("管理代码版本和协作开发", "Manage code versions and collaborative development"),
        options: &[],
        examples: &[
            t("git clone url  # 克隆仓库", "git clone url  # Clone repository"),
            t("git pull  # 拉取更新", "git pull  # Pull updates"),
            t("git push  # 推送更改", "git push  # Push changes"),
            t("git commit -am 'message'  # 提交更改", "git commit -am 'message'  # Commit changes"),
        ],
        warnings: &[t("强制推送会覆盖远程历史", "Force push will overwrite remote history")],
        alternatives: &[],
    },
    CommandInfo {
        name: "mkdir",
        description: t("创建目录", "Create directories"),
        purpose: t("创建新的目录", "Create new directories"),
        options: &[
            opt('p', "parents", t("创建父目录", "Create parent directories")),
            opt('v', "verbose", t("显示创建过程", "Verbose output")),
        ],
        examples: &[
            t("mkdir newdir  # 创建目录", "mkdir newdir  # Create directory"),
            t("mkdir -p path/to/dir  # 创建多级目录", "mkdir -p path/to/dir  # Create nested directories"),
        ],
        warnings: &[],
        alternatives: &[],
    },
    CommandInfo {
        name: "rmdir",
        description: t("删除空目录", "Remove empty directories"),
        purpose: t("删除指定的空目录", "Remove specified empty directories"),
        options: &[],
        examples: &[t("rmdir emptydir  # 删除空目录", "rmdir emptydir  # Remove empty directory")],
        warnings: &[t("只能删除空目录", "Only works on empty directories")],
        alternatives: &[],
    },
    CommandInfo {
        name: "touch",
        description: t("创建空文件或更新时间戳", "Create empty files or update timestamps"),
        purpose: t("创建新文件或更新文件访问时间", "Create new files or update file access time"),
        options: &[],
        examples: &[t("touch newfile.txt  # 创建空文件", "touch newfile.txt  # Create empty file")],
        warnings: &[],
        alternatives: &[],
    },
    CommandInfo {
        name: "ln",
        description: t("创建链接", "Create links"),
        purpose: t("创建文件或目录的链接", "Create links to files or directories"),
        options: &[opt('s', "symbolic", t("创建符号链接", "Make a symbolic link"))],
        examples: &[
            t("ln -s target link  # 创建符号链接", "ln -s target link  # Create symbolic link"),
            t("ln target hardlink  # 创建硬链接", "ln target hardlink  # Create hard link"),
        ],
        warnings: &[t(
            "符号链接指向的文件被删除后链接会失效",
            "Symbolic links become invalid if target is deleted",
        )],
        alternatives: &[],
    },
];

static DATABASE: LazyLock<HashMap<&'static str, &'static CommandInfo>> =
    LazyLock::new(|| ENTRIES.iter().map(|entry| (entry.name, entry)).collect());

/// Look up the reference entry for a program name.
pub fn lookup(command: &str) -> Option<&'static CommandInfo> {
    DATABASE.get(command).copied()
}

pub fn known_commands() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|entry| entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_is_reachable_by_name() {
        for name in known_commands() {
            let entry = lookup(name);
            assert!(entry.is_some(), "{name} missing");
            assert_eq!(entry.map(|e| e.name), Some(name));
        }
        assert_eq!(known_commands().count(), 16);
        assert!(lookup("frobnicate").is_none());
    }

    #[test]
    fn test_entries_are_localized() {
        for name in known_commands() {
            let Some(entry) = lookup(name) else { continue };
            assert!(!entry.description.zh.is_empty());
            assert!(!entry.description.en.is_empty());
            assert_ne!(entry.description.zh, entry.description.en);
        }
    }

    #[test]
    fn test_option_lookup() {
        let Some(rm) = lookup("rm") else {
            panic!("rm entry missing");
        };
        assert_eq!(rm.option("r").map(|o| o.long), Some("recursive"));
        assert_eq!(rm.option("force").map(|o| o.short), Some('f'));
        assert!(rm.option("z").is_none());
        assert!(rm.option("").is_none());
    }
}
