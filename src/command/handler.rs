use std::io::{self, Write};

use eyre::WrapErr;
use log::info;
use tokio::fs::read;

use super::{Invocation, Mode};
use crate::language::resolve;
use crate::render::render;
use crate::wandbox::{CompileRequest, Wandbox};

pub async fn dispatch<W: Write>(
    invocation: &Invocation,
    wandbox: &Wandbox,
    out: &mut W,
) -> eyre::Result<()> {
    match &invocation.mode {
        Mode::ListLanguages => list_languages(wandbox, out).await,
        Mode::ListCompilers(language) => list_compilers(wandbox, language, out).await,
        Mode::ListStandards(compiler) => list_standards(wandbox, compiler, out).await,
        Mode::Compile(filename) => {
            compile(
                wandbox,
                filename,
                invocation.compiler.as_deref(),
                invocation.standard.as_deref(),
                out,
            )
            .await
        }
    }
}

pub async fn list_languages<W: Write>(wandbox: &Wandbox, out: &mut W) -> eyre::Result<()> {
    let catalog = wandbox.catalog().await?;
    print_lines(catalog.languages(), out)?;
    Ok(())
}

pub async fn list_compilers<W: Write>(
    wandbox: &Wandbox,
    language: &str,
    out: &mut W,
) -> eyre::Result<()> {
    let catalog = wandbox.catalog().await?;
    print_lines(catalog.compilers(language), out)?;
    Ok(())
}

pub async fn list_standards<W: Write>(
    wandbox: &Wandbox,
    compiler: &str,
    out: &mut W,
) -> eyre::Result<()> {
    let catalog = wandbox.catalog().await?;
    print_lines(catalog.standards(compiler), out)?;
    Ok(())
}

pub async fn compile<W: Write>(
    wandbox: &Wandbox,
    filename: &str,
    compiler: Option<&str>,
    standard: Option<&str>,
    out: &mut W,
) -> eyre::Result<()> {
    let resolved = resolve(filename, compiler, standard);
    let bytes = read(filename)
        .await
        .wrap_err_with(|| format!("failed to read {}", filename))?;
    let code = String::from_utf8(bytes)
        .wrap_err_with(|| format!("{} is not valid UTF-8", filename))?;
    info!(
        "submitting {} ({} bytes) to {}",
        filename,
        code.len(),
        wandbox.base_url()
    );
    let request = CompileRequest::new(&code, &resolved.compiler, &resolved.standard);
    let result = wandbox.compile(&request).await?;
    render(&result, out)?;
    Ok(())
}

fn print_lines<'a, W: Write>(lines: impl IntoIterator<Item = &'a str>, out: &mut W) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::UsageError;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn invocation(args: &[&str]) -> Result<Invocation, UsageError> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        Invocation::parse(&args)
    }

    async fn serve_list(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [
                    {"name": "gcc-head", "language": "C++", "switches": [
                        {"name": "std-cxx", "options": [{"name": "c++17"}, {"name": "c++2b"}]}
                    ]},
                    {"name": "clang-head", "language": "C++", "switches": []}
                ],
                [
                    {"name": "cpython-head", "language": "Python", "switches": []}
                ]
            ])))
            .expect(1)
            .mount(server)
            .await;
    }

    fn compile_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!([{
            "status": "0",
            "compiler_message": "",
            "program_error": "",
            "program_output": "hi\n"
        }]))
    }

    async fn run(server: &MockServer, args: &[&str]) -> eyre::Result<String> {
        let wandbox = Wandbox::new(server.uri())?;
        let mut out = Vec::new();
        dispatch(&invocation(args)?, &wandbox, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn lists_each_language_once() {
        let server = MockServer::start().await;
        serve_list(&server).await;
        let out = run(&server, &["--list-languages"]).await.unwrap();
        assert_eq!(out, "C++\nPython\n");
    }

    #[tokio::test]
    async fn lists_compilers_for_language() {
        let server = MockServer::start().await;
        serve_list(&server).await;
        let out = run(&server, &["--list-compilers=C++"]).await.unwrap();
        assert_eq!(out, "gcc-head\nclang-head\n");
    }

    #[tokio::test]
    async fn unknown_compiler_lists_no_standards() {
        let server = MockServer::start().await;
        serve_list(&server).await;
        let out = run(&server, &["--list-standards=nope"]).await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn lists_standards_for_compiler() {
        let server = MockServer::start().await;
        serve_list(&server).await;
        let out = run(&server, &["--list-standards=gcc-head"]).await.unwrap();
        assert_eq!(out, "c++17\nc++2b\n");
    }

    #[tokio::test]
    async fn cpp_file_uses_cpp_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/compile.json"))
            .and(body_json(json!({
                "code": "int main(){}",
                "options": "warning,c++17",
                "compiler": "gcc-head"
            })))
            .respond_with(compile_response())
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("foo.cpp");
        std::fs::write(&file, "int main(){}").unwrap();
        let out = run(&server, &[file.to_str().unwrap()]).await.unwrap();
        assert_eq!(out, "\x1b[32m\x1b[31m\x1b[0mhi\n");
    }

    #[tokio::test]
    async fn explicit_std_overrides_c_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/compile.json"))
            .and(body_json(json!({
                "code": "int main(void) { return 0; }\n",
                "options": "warning,c99",
                "compiler": "gcc-head-c"
            })))
            .respond_with(compile_response())
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("foo.c");
        std::fs::write(&file, "int main(void) { return 0; }\n").unwrap();
        run(&server, &["--std=c99", file.to_str().unwrap()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_fatal_before_submitting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(compile_response())
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("missing.cpp");
        let err = run(&server, &[file.to_str().unwrap()]).await.unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[tokio::test]
    async fn non_utf8_source_is_fatal_before_submitting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(compile_response())
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let file = dir.path().join("foo.cpp");
        std::fs::write(&file, b"char s[] = \"\xff\xfe\";").unwrap();
        let err = run(&server, &[file.to_str().unwrap()]).await.unwrap_err();
        assert!(err.to_string().contains("is not valid UTF-8"));
    }

    #[tokio::test]
    async fn two_files_make_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(compile_response())
            .expect(0)
            .mount(&server)
            .await;

        let err = run(&server, &["file1", "file2"]).await.unwrap_err();
        assert!(err.downcast_ref::<UsageError>().is_some());
    }
}
