//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::{find_config, CONFIG_FILE};

const DEFAULT_CONFIG: &str = r#"# Site
title: My Blog
description: ''
author:
  name: John Doe
  summary: ''
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: content/blog
assets_dir: content/assets
public_dir: public

# Writing
render_drafts: false
date_format: MMMM DD, YYYY
highlight:
  theme: base16-ocean.dark
  line_number: false

# Listing pages. A page with `featured` embeds that document above the list.
pages:
  - path: /
    heading: Posts
    # featured: /hello-world/

# Build stages, applied in order
stages:
  - kind: images
    max_width: 630
  - kind: iframes
    wrapper_style: 'margin-bottom: 1.0725rem'
  - kind: analytics
    tracking_id_env: GOOGLE_ANALYTICS_ID
  - kind: sitemap
    output: /sitemap.xml
    exclude: []
"#;

const DEFAULT_STYLE: &str = r#"body { font-family: system-ui, sans-serif; }
.global-wrapper { margin: 0 auto; max-width: 42rem; padding: 2.5rem 1.25rem; }
.post-list-item { margin-bottom: 1rem; }
.blog-post-nav ul { display: flex; justify-content: space-between; list-style: none; padding: 0; }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if let Some(existing) = find_config(target_dir) {
        bail!("{:?} already contains {:?}", target_dir, existing);
    }

    fs::create_dir_all(target_dir.join("content/blog/hello-world"))?;
    fs::create_dir_all(target_dir.join("content/assets"))?;

    fs::write(target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    fs::write(target_dir.join("content/assets/style.css"), DEFAULT_STYLE)?;

    let today = chrono::Local::now().date_naive();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
description: The first post
---

This is your very first post. Edit it in `content/blog/hello-world/index.md`.

<!-- more -->

## Writing

```bash
$ folio new "My New Post"
```

## Building

```bash
$ folio generate
```
"#,
        today.format("%Y-%m-%d")
    );

    fs::write(
        target_dir.join("content/blog/hello-world/index.md"),
        sample_post,
    )?;

    Ok(())
}
