//! Property tests for the image-link rewriter.
//!
//! Context paths are drawn from an alphabet full of regex metacharacters so
//! any accidental pattern interpretation of the context shows up here.

use proptest::prelude::*;
use proptest::test_runner::Config;
use wiki_publish::{
    classify_target, join_image_links, rewrite_image_links, rewrite_target, TargetKind,
};

/// One to three path segments, each made of word characters and
/// metacharacters. `)` `]` and newlines are excluded so the context can also
/// appear inside a full `![alt](target)` reference.
fn context_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z0-9_.*+?^${}(|\\[\\\\-]{1,8}", 1..4).prop_map(|s| s.join("/"))
}

fn rest_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}(/[a-z0-9_-]{1,8}){0,3}\\.(png|svg|gif)"
}

fn alt_strategy() -> impl Strategy<Value = String> {
    "[^\\]\\n]{0,16}"
}

fn starts_with_context(path: &str, ctx: &str) -> bool {
    path == ctx || path.starts_with(&format!("{ctx}/"))
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn external_targets_are_never_altered(
        alt in alt_strategy(),
        target in "https?://[a-z0-9.-]{1,12}/[A-Za-z0-9/._?=&-]{0,24}",
        ctx in context_strategy(),
    ) {
        let doc = format!("![{alt}]({target})");
        prop_assert_eq!(rewrite_image_links(&doc, &ctx), doc.clone());
        prop_assert_eq!(join_image_links(&doc, &ctx), doc);
    }

    #[test]
    fn dot_relative_targets_are_never_altered(
        alt in alt_strategy(),
        prefix in "(\\./|\\.\\./){1,3}",
        rest in rest_strategy(),
        ctx in context_strategy(),
    ) {
        let doc = format!("![{alt}]({prefix}{rest})");
        prop_assert_eq!(rewrite_image_links(&doc, &ctx), doc);
    }

    #[test]
    fn root_anchored_context_is_stripped(
        slashes in 1usize..4,
        ctx in context_strategy(),
        rest in rest_strategy(),
    ) {
        let target = format!("{}{ctx}/{rest}", "/".repeat(slashes));
        prop_assert_eq!(rewrite_target(&target, &ctx), rest.as_str());
    }

    #[test]
    fn leading_slash_is_optional(
        ctx in context_strategy(),
        rest in rest_strategy(),
    ) {
        let bare = format!("{ctx}/{rest}");
        prop_assume!(classify_target(&bare) == TargetKind::Bare);
        let anchored = format!("/{bare}");
        prop_assert_eq!(rewrite_target(&bare, &ctx), rewrite_target(&anchored, &ctx));
    }

    #[test]
    fn relative_outputs_are_fixed_points(
        alt in alt_strategy(),
        target in prop_oneof![
            rest_strategy(),
            rest_strategy().prop_map(|r| format!("./{r}")),
            rest_strategy().prop_map(|r| format!("../{r}")),
        ],
        ctx in context_strategy(),
    ) {
        prop_assume!(!starts_with_context(&target, &ctx));
        let doc = format!("![{alt}]({target})");
        let once = rewrite_image_links(&doc, &ctx);
        let twice = rewrite_image_links(&once, &ctx);
        prop_assert_eq!(&once, &doc);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn documents_without_images_pass_through(
        doc in "[^!]{0,200}",
        ctx in context_strategy(),
    ) {
        prop_assert_eq!(rewrite_image_links(&doc, &ctx), doc.clone());
        prop_assert_eq!(join_image_links(&doc, &ctx), doc);
    }

    #[test]
    fn surrounding_text_is_preserved(
        before in "[^!]{0,40}",
        after in "[^!]{0,40}",
        ctx in context_strategy(),
        rest in rest_strategy(),
    ) {
        let doc = format!("{before}![img](/{ctx}/{rest}){after}");
        let expected = format!("{before}![img]({rest}){after}");
        prop_assert_eq!(rewrite_image_links(&doc, &ctx), expected);
    }

    #[test]
    fn empty_context_only_strips_slashes(
        slashes in 0usize..4,
        rest in rest_strategy(),
    ) {
        let target = format!("{}{rest}", "/".repeat(slashes));
        prop_assert_eq!(rewrite_target(&target, ""), rest.as_str());
    }
}

#[test]
fn scenario_join_relative_link() {
    assert_eq!(
        join_image_links("![Test Image](images/test.png)", "docs/subfolder"),
        "![Test Image](docs/subfolder/images/test.png)"
    );
}

#[test]
fn scenario_external_link() {
    let content = "![External Image](https://example.com/image.png)";
    assert_eq!(rewrite_image_links(content, "docs"), content);
}

#[test]
fn scenario_root_anchored_nested() {
    assert_eq!(
        rewrite_image_links("![Test Image](/docs/subfolder/images/test.png)", "docs"),
        "![Test Image](subfolder/images/test.png)"
    );
}

#[test]
fn scenario_root_anchored_top_level() {
    assert_eq!(
        rewrite_image_links("![Test Image](/docs/test.png)", "docs"),
        "![Test Image](test.png)"
    );
}

#[test]
fn scenario_dot_relative() {
    let content = "![Test Image](../images/test.png)";
    assert_eq!(rewrite_image_links(content, "docs"), content);
}

#[test]
fn scenario_three_references() {
    let content = "Intro paragraph.\n\n\
        ![Root](/docs/guide/images/root.png)\n\
        Some text between ![Bare](images/bare.png) references.\n\
        ![External](http://cdn.example.com/ext.png)\n\
        Trailing line.";
    let expected = "Intro paragraph.\n\n\
        ![Root](guide/images/root.png)\n\
        Some text between ![Bare](images/bare.png) references.\n\
        ![External](http://cdn.example.com/ext.png)\n\
        Trailing line.";
    assert_eq!(rewrite_image_links(content, "docs"), expected);
}
