//! Pointer-driven 3D tilt for card blocks.
//!
//! `TiltStyle::hover` maps a pointer position inside a tile to a rotation,
//! glare and shadow offset. `TiltStyle::resting` is the pose a tile settles
//! back to when the pointer leaves. Both are closed-form and side-effect free;
//! the browser evaluates the same formula through `client_script`, which is
//! generated from the constants below.

/// Maximum rotation in degrees, reached at the tile edges.
pub const TILT_DEGREES: f64 = 10.0;
pub const PERSPECTIVE_PX: u32 = 800;
pub const HOVER_SCALE: f64 = 1.02;
/// Shadow offset per degree of rotation.
pub const SHADOW_FACTOR: f64 = 1.5;

const HOVER_TRANSITION: &str = "transform 0.1s ease-out, box-shadow 0.1s ease-out";
const REST_TRANSITION: &str = "transform 0.5s ease-out, box-shadow 0.5s ease-out";
const REST_SHADOW: &str = "0 4px 6px -1px rgba(0, 0, 0, 0.1)";
/// Blur and ambient layer following the hover shadow's x/y offsets.
const HOVER_SHADOW_TAIL: &str = "25px rgba(0,0,0,0.15), 0 8px 30px rgba(0,0,0,0.1)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltStyle {
    pub rotate_x: f64,
    pub rotate_y: f64,
    /// Glare highlight position, percent of the tile.
    pub glare_x: f64,
    pub glare_y: f64,
    pub shadow_x: f64,
    pub shadow_y: f64,
    hovered: bool,
}

impl TiltStyle {
    /// Pose for a pointer at client coordinates `(client_x, client_y)` over `rect`.
    pub fn hover(rect: Rect, client_x: f64, client_y: f64) -> Self {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Self::resting();
        }
        let x = client_x - rect.left;
        let y = client_y - rect.top;
        let center_x = rect.width / 2.0;
        let center_y = rect.height / 2.0;

        let rotate_x = ((y - center_y) / center_y) * -TILT_DEGREES;
        let rotate_y = ((x - center_x) / center_x) * TILT_DEGREES;

        TiltStyle {
            rotate_x,
            rotate_y,
            glare_x: x / rect.width * 100.0,
            glare_y: y / rect.height * 100.0,
            shadow_x: rotate_y * SHADOW_FACTOR,
            shadow_y: rotate_x * -SHADOW_FACTOR,
            hovered: true,
        }
    }

    pub fn resting() -> Self {
        TiltStyle {
            rotate_x: 0.0,
            rotate_y: 0.0,
            glare_x: 50.0,
            glare_y: 50.0,
            shadow_x: 0.0,
            shadow_y: 0.0,
            hovered: false,
        }
    }

    pub fn is_resting(&self) -> bool {
        !self.hovered
    }

    pub fn transform(&self) -> String {
        let scale = if self.hovered { HOVER_SCALE } else { 1.0 };
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) scale3d({}, {}, {})",
            PERSPECTIVE_PX, self.rotate_x, self.rotate_y, scale, scale, scale
        )
    }

    pub fn box_shadow(&self) -> String {
        if self.hovered {
            format!("{}px {}px {}", self.shadow_x, self.shadow_y, HOVER_SHADOW_TAIL)
        } else {
            REST_SHADOW.to_string()
        }
    }

    pub fn transition(&self) -> &'static str {
        if self.hovered {
            HOVER_TRANSITION
        } else {
            REST_TRANSITION
        }
    }

    /// Inline `style` declarations for this pose.
    pub fn css(&self) -> String {
        let mut css = format!(
            "transform:{};box-shadow:{};transition:{};",
            self.transform(),
            self.box_shadow(),
            self.transition()
        );
        if self.hovered {
            css.push_str(&format!(
                "--glare-x:{}%;--glare-y:{}%;",
                self.glare_x, self.glare_y
            ));
        }
        css
    }
}

/// Browser-side binding for `.tilt` elements. Mirrors `TiltStyle::hover` and
/// `TiltStyle::resting` exactly. Exposes `bentoTilt(root)` so blocks swapped
/// in after a feed load can be bound too.
pub fn client_script() -> String {
    format!(
        r#"(function(){{
var K={k},P={p},S={s},F={f};
window.bentoTilt=function(root){{root.querySelectorAll('.tilt').forEach(function(el){{
    if(el.dataset.tiltBound)return;
    el.dataset.tiltBound='1';
    el.addEventListener('mousemove',function(e){{
        var r=el.getBoundingClientRect();
        if(r.width<=0||r.height<=0)return;
        var x=e.clientX-r.left,y=e.clientY-r.top,cx=r.width/2,cy=r.height/2;
        var rx=((y-cy)/cy)*-K,ry=((x-cx)/cx)*K;
        el.style.transform='perspective('+P+'px) rotateX('+rx+'deg) rotateY('+ry+'deg) scale3d('+S+', '+S+', '+S+')';
        el.style.boxShadow=(ry*F)+'px '+(rx*-F)+'px {tail}';
        el.style.transition='{ht}';
        el.style.setProperty('--glare-x',(x/r.width*100)+'%');
        el.style.setProperty('--glare-y',(y/r.height*100)+'%');
    }});
    el.addEventListener('mouseleave',function(){{
        el.style.transform='perspective('+P+'px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)';
        el.style.boxShadow='{rs}';
        el.style.transition='{rt}';
    }});
}});}};
window.bentoTilt(document);
}})();"#,
        k = TILT_DEGREES,
        p = PERSPECTIVE_PX,
        s = HOVER_SCALE,
        f = SHADOW_FACTOR,
        ht = HOVER_TRANSITION,
        rs = REST_SHADOW,
        tail = HOVER_SHADOW_TAIL,
        rt = REST_TRANSITION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: Rect = Rect { left: 100.0, top: 50.0, width: 200.0, height: 120.0 };

    #[test]
    fn center_is_flat() {
        let t = TiltStyle::hover(RECT, 200.0, 110.0);
        assert_eq!(t.rotate_x, 0.0);
        assert_eq!(t.rotate_y, 0.0);
        assert_eq!(t.glare_x, 50.0);
        assert_eq!(t.glare_y, 50.0);
    }

    #[test]
    fn rotation_is_bounded_and_signed() {
        let mut px = 101.0;
        while px < 300.0 {
            let mut py = 51.0;
            while py < 170.0 {
                let t = TiltStyle::hover(RECT, px, py);
                assert!(t.rotate_x.abs() <= TILT_DEGREES);
                assert!(t.rotate_y.abs() <= TILT_DEGREES);
                // Right of center tilts positive Y, below center tilts negative X.
                assert_eq!(t.rotate_y > 0.0, px > 200.0);
                assert_eq!(t.rotate_x < 0.0, py > 110.0);
                py += 7.0;
            }
            px += 9.0;
        }
    }

    #[test]
    fn corners_reach_full_tilt() {
        let t = TiltStyle::hover(RECT, 300.0, 170.0);
        assert_eq!(t.rotate_x, -TILT_DEGREES);
        assert_eq!(t.rotate_y, TILT_DEGREES);
        assert_eq!(t.shadow_x, 15.0);
        assert_eq!(t.shadow_y, 15.0);
    }

    #[test]
    fn resting_pose_is_identity() {
        let r = TiltStyle::resting();
        assert!(r.is_resting());
        assert_eq!((r.rotate_x, r.rotate_y), (0.0, 0.0));
        assert_eq!(
            r.transform(),
            "perspective(800px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)"
        );
        assert!(r.transition().contains("0.5s"));
        assert!(!r.css().contains("--glare"));
    }

    #[test]
    fn hover_css_carries_glare_and_fast_transition() {
        let t = TiltStyle::hover(RECT, 150.0, 80.0);
        let css = t.css();
        assert!(css.contains("scale3d(1.02, 1.02, 1.02)"));
        assert!(css.contains("--glare-x:25%"));
        assert!(css.contains("0.1s ease-out"));
    }

    #[test]
    fn browser_script_uses_the_same_formula() {
        let js = client_script();
        assert!(js.contains("var K=10,P=800,S=1.02,F=1.5;"));
        // Rotation: rotate_x from the vertical offset, rotate_y from the horizontal.
        assert!(js.contains("var rx=((y-cy)/cy)*-K,ry=((x-cx)/cx)*K;"));
        // Glare follows the pointer as a percentage of the tile.
        assert!(js.contains("(x/r.width*100)+'%'"));
        assert!(js.contains("(y/r.height*100)+'%'"));
        // Shadow: x from rotate_y, y from rotate_x, both scaled by F.
        let t = TiltStyle::hover(RECT, 300.0, 170.0);
        assert!(js.contains(&format!("(ry*F)+'px '+(rx*-F)+'px {}'", HOVER_SHADOW_TAIL)));
        assert!(t.box_shadow().ends_with(HOVER_SHADOW_TAIL));
        // Leaving restores the resting pose.
        assert!(js.contains(&format!("el.style.boxShadow='{}'", REST_SHADOW)));
        assert!(js.contains(&format!("el.style.transition='{}'", TiltStyle::resting().transition())));
        assert!(js.contains(&format!("el.style.transition='{}'", t.transition())));
    }

    #[test]
    fn degenerate_rect_rests() {
        let t = TiltStyle::hover(Rect { left: 0.0, top: 0.0, width: 0.0, height: 10.0 }, 3.0, 3.0);
        assert!(t.is_resting());
    }
}
