fn main() {
    // Embed Windows resources (version info)
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "Portable Shelf");
        res.set(
            "FileDescription",
            "Start Menu reconciliation for portable applications",
        );
        res.set("CompanyName", "Portable Shelf Contributors");
        res.set("OriginalFilename", "portable-shelf.exe");
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        res.compile().unwrap();
    }
}
