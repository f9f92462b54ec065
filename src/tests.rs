use crate::*;

macro_rules! html_opts {
    ([$($class:ident.$flag:ident),*], $lhs:expr, $rhs:expr $(,)?) => {{
        #[allow(unused_mut)]
        let mut opts = $crate::Options::default();
        $(html_opts!(@set opts, $class, $flag);)*
        $crate::tests::html_opts_i($lhs, $rhs, &opts);
    }};
    (@set $opts:ident, extension, $flag:ident) => {
        $opts.extension |= $crate::Extensions::$flag;
    };
    (@set $opts:ident, render, $flag:ident) => {
        $opts.render |= $crate::RenderFlags::$flag;
    };
}

mod autolink;
mod core;
mod extensions;
mod nesting;

#[track_caller]
fn compare_strs(output: &str, expected: &str, kind: &str, input: &str) {
    if output != expected {
        println!("Running {} test", kind);
        println!("Input:");
        println!("==============================");
        println!("{}", input);
        println!("==============================");
        println!("Got:");
        println!("==============================");
        println!("{}", output);
        println!("==============================");
        println!();
        println!("Expected:");
        println!("==============================");
        println!("{}", expected);
        println!("==============================");
        println!();
    }
    pretty_assertions::assert_eq!(output, expected);
}

#[track_caller]
fn html(input: &str, expected: &str) {
    html_opts_i(input, expected, &Options::default());
}

/// Renders with `options` and checks the output. A reused renderer must
/// produce the same output again.
#[track_caller]
fn html_opts_i(input: &str, expected: &str, options: &Options) {
    let output = markdown_to_html(input, options);
    compare_strs(&output, expected, "regular", input);

    let mut renderer = Renderer::new(*options);
    let first = renderer.render(input);
    let second = renderer.render(input);
    compare_strs(&first, expected, "renderer", input);
    compare_strs(&second, expected, "reused renderer", input);
}

/// Renders through `callbacks` and checks the output.
#[track_caller]
fn html_callbacks(input: &str, expected: &str, options: Options, callbacks: Callbacks<'_>) {
    let mut renderer = Renderer::with_callbacks(options, callbacks);
    let output = renderer.render(input);
    compare_strs(&output, expected, "callbacks", input);
}
